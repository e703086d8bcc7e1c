use crate::catalog::{Catalog, Category, LocationRecord};
use crate::intent::{IntentAnalysis, IntentType};
use crate::lexicon::Lexicon;
use crate::search::QueryResolution;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

pub const MAX_RECOMMENDATIONS: usize = 6;
/// Below this resolution confidence only intent and popularity picks are made.
const RELATED_CONFIDENCE_GATE: f64 = 0.5;
const REGION_LIMIT: usize = 4;
const REGION_MIN_FOUND: usize = 2;
const REGION_NAME_SCORE: f64 = 1.0;
const REGION_KEYWORD_SCORE: f64 = 0.5;
const OVERLAP_LIMIT: usize = 3;
const OVERLAP_MIN_SCORE: f64 = 0.05;
const NAME_TOKEN_BONUS: f64 = 0.5;
const SHARED_REGION_BONUS: f64 = 0.4;
const SAME_CATEGORY_MIN_TOTAL: usize = 4;
const SAME_CATEGORY_LIMIT: usize = 2;
const PREDICTION_LIMIT: usize = 4;

/// Picks up to six other locations worth showing next to a resolved query.
pub struct Recommender<'a> {
    catalog: &'a Catalog,
    lexicon: &'a Lexicon,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a Catalog, lexicon: &'a Lexicon) -> Self {
        Self { catalog, lexicon }
    }

    pub fn recommend(
        &self,
        resolution: &QueryResolution,
        intent: &IntentAnalysis,
    ) -> Vec<&'a LocationRecord> {
        let primary = self.primary(resolution);
        let mut list = RecommendationList::new(primary.map(|p| p.code.as_str()));

        if let Some(primary) = primary.filter(|_| resolution.confidence > RELATED_CONFIDENCE_GATE) {
            self.add_related(primary, &mut list);
        }

        match intent.intent_type {
            IntentType::Realtime => {
                for entry in &self.lexicon.realtime_spotlight {
                    if let Some(location) = self.first_named(entry) {
                        list.push(location);
                    }
                }
            }
            IntentType::Prediction => {
                let forecastable = self
                    .catalog
                    .by_category(Category::TouristZone)
                    .into_iter()
                    .chain(self.catalog.by_category(Category::Park))
                    .take(PREDICTION_LIMIT);
                for location in forecastable {
                    list.push(location);
                }
            }
            IntentType::General => {}
        }

        for location in self.catalog.all() {
            if list.len() >= MAX_RECOMMENDATIONS {
                break;
            }
            if matches!(location.category, Category::TouristZone | Category::DenseArea) {
                list.push(location);
            }
        }

        let recommendations = list.finish();
        debug!(
            primary = %resolution.matched_location_name,
            intent = ?intent.intent_type,
            count = recommendations.len(),
            "Built recommendations"
        );
        recommendations
    }

    fn primary(&self, resolution: &QueryResolution) -> Option<&'a LocationRecord> {
        if !resolution.is_match() {
            return None;
        }
        resolution
            .matched_location_code
            .as_deref()
            .and_then(|code| self.catalog.by_code(code))
            .or_else(|| self.catalog.by_name(&resolution.matched_location_name))
    }

    /// Region, neighbor, keyword-overlap and same-category picks.
    fn add_related(&self, primary: &'a LocationRecord, list: &mut RecommendationList<'a>) {
        if let Some(region) = extract_region(&primary.name, self.lexicon) {
            let found = self.add_region_matches(primary, &region, list);
            if found < REGION_MIN_FOUND {
                self.add_neighbor_matches(primary, &region, REGION_LIMIT - found, list);
            }
        }

        let mut overlapping: Vec<(&'a LocationRecord, f64)> = self
            .others(primary)
            .map(|location| (location, self.keyword_overlap(primary, location)))
            .filter(|(_, score)| *score > OVERLAP_MIN_SCORE)
            .collect();
        overlapping.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        for (location, _) in overlapping.into_iter().take(OVERLAP_LIMIT) {
            list.push(location);
        }

        if list.len() < SAME_CATEGORY_MIN_TOTAL {
            let mut added = 0;
            for location in self.catalog.by_category(primary.category) {
                if added == SAME_CATEGORY_LIMIT {
                    break;
                }
                if list.push(location) {
                    added += 1;
                }
            }
        }
    }

    fn add_region_matches(
        &self,
        primary: &'a LocationRecord,
        region: &str,
        list: &mut RecommendationList<'a>,
    ) -> usize {
        let mut scored: Vec<(&'a LocationRecord, f64)> = self
            .others(primary)
            .map(|location| {
                let mut score = 0.0;
                if location.name.contains(region) {
                    score += REGION_NAME_SCORE;
                }
                if location.keyword_contains(region) {
                    score += REGION_KEYWORD_SCORE;
                }
                (location, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let mut found = 0;
        for (location, _) in scored.into_iter().take(REGION_LIMIT) {
            if list.push(location) {
                found += 1;
            }
        }
        debug!(region, found, "Region candidates");
        found
    }

    fn add_neighbor_matches(
        &self,
        primary: &'a LocationRecord,
        region: &str,
        quota: usize,
        list: &mut RecommendationList<'a>,
    ) {
        let neighbors = self.lexicon.neighbors_of(region);
        if neighbors.is_empty() {
            return;
        }

        let mut added = 0;
        for location in self.others(primary) {
            if added == quota {
                break;
            }
            let near = neighbors.iter().any(|neighbor| {
                location.name.contains(neighbor.as_str()) || location.keyword_contains(neighbor)
            });
            if near && list.push(location) {
                added += 1;
            }
        }
        debug!(region, added, "Neighbor candidates");
    }

    fn keyword_overlap(&self, primary: &LocationRecord, other: &LocationRecord) -> f64 {
        let mut score = keyword_jaccard(primary, other);

        let primary_tokens = name_tokens(&primary.name);
        let other_tokens = name_tokens(&other.name);
        for a in &primary_tokens {
            for b in &other_tokens {
                if a.contains(b) || b.contains(a) {
                    score += NAME_TOKEN_BONUS;
                }
            }
        }

        let shares_region = self
            .lexicon
            .well_known_regions
            .iter()
            .any(|region| primary.name.contains(region.as_str()) && other.name.contains(region.as_str()));
        if shares_region {
            score += SHARED_REGION_BONUS;
        }
        score
    }

    fn others(&self, primary: &'a LocationRecord) -> impl Iterator<Item = &'a LocationRecord> + 'a {
        let code = primary.code.as_str();
        self.catalog.all().iter().filter(move |location| location.code != code)
    }

    fn first_named(&self, entry: &str) -> Option<&'a LocationRecord> {
        self.catalog.all().iter().find(|location| location.name.contains(entry))
    }
}

/// District name for a location: the first known district its name contains,
/// else the leading word of the name. A name that starts with a separator
/// has no leading word.
pub fn extract_region(name: &str, lexicon: &Lexicon) -> Option<String> {
    if let Some(district) = lexicon.districts.iter().find(|d| name.contains(d.as_str())) {
        return Some(district.clone());
    }
    name.split(|c: char| c.is_whitespace() || matches!(c, '·' | '(' | ')'))
        .next()
        .filter(|part| part.chars().count() > 1)
        .map(str::to_string)
}

fn name_tokens(name: &str) -> Vec<&str> {
    name.split(|c: char| c.is_whitespace() || c == '·')
        .filter(|part| part.chars().count() > 1)
        .collect()
}

fn keyword_jaccard(a: &LocationRecord, b: &LocationRecord) -> f64 {
    let left: HashSet<String> = a.keywords.iter().map(|k| k.to_lowercase()).collect();
    let right: HashSet<String> = b.keywords.iter().map(|k| k.to_lowercase()).collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Ordered, code-deduplicated picks that never include the primary match.
struct RecommendationList<'a> {
    excluded: Option<&'a str>,
    seen: HashSet<&'a str>,
    items: Vec<&'a LocationRecord>,
}

impl<'a> RecommendationList<'a> {
    fn new(excluded: Option<&'a str>) -> Self {
        Self {
            excluded,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Returns whether the location was added.
    fn push(&mut self, location: &'a LocationRecord) -> bool {
        if self.excluded == Some(location.code.as_str()) {
            return false;
        }
        if !self.seen.insert(location.code.as_str()) {
            return false;
        }
        self.items.push(location);
        true
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn finish(mut self) -> Vec<&'a LocationRecord> {
        self.items.truncate(MAX_RECOMMENDATIONS);
        self.items
    }
}
