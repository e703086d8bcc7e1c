use crate::catalog::Catalog;
use crate::lexicon::Lexicon;
use crate::search::keywords::extract_keywords;
use crate::search::scoring::score_match;
use crate::search::{MatchCandidate, QueryResolution};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

pub const MIN_MATCH_SCORE: f64 = 0.3;
const MAX_DISTINCT_MATCHES: usize = 10;
const MAX_SUGGESTIONS: usize = 5;
const SAME_CATEGORY_SUGGESTIONS: usize = 3;
const RUNNER_UP_SUGGESTIONS: usize = 5;

/// Resolves a free-form query to the single best catalog location.
///
/// Never fails: an unmatched query comes back with zero confidence and an
/// empty location name.
pub fn resolve_query(query: &str, catalog: &Catalog, lexicon: &Lexicon) -> QueryResolution {
    let tokens = extract_keywords(query, lexicon);
    let ranked = rank_matches(&tokens, catalog);

    let Some(primary) = ranked.first() else {
        debug!(query, tokens = tokens.len(), "No location matched");
        return QueryResolution {
            extracted_token: tokens.first().cloned().unwrap_or_default(),
            matched_location_name: String::new(),
            matched_location_code: None,
            confidence: 0.0,
            original_query: query.to_string(),
            suggestions: Vec::new(),
        };
    };

    debug!(
        query,
        token = %primary.matched_token,
        location = %primary.location.name,
        score = primary.score,
        candidates = ranked.len(),
        "Resolved query"
    );

    QueryResolution {
        extracted_token: primary.matched_token.clone(),
        matched_location_name: primary.location.name.clone(),
        matched_location_code: Some(primary.location.code.clone()),
        confidence: primary.score.clamp(0.0, 1.0),
        original_query: query.to_string(),
        suggestions: build_suggestions(&ranked, catalog, lexicon),
    }
}

/// Scores every (token, location) pair and keeps the best pair per location,
/// best first, at most ten locations.
pub fn rank_matches<'a>(tokens: &[String], catalog: &'a Catalog) -> Vec<MatchCandidate<'a>> {
    let mut pairs: Vec<MatchCandidate<'a>> = tokens
        .par_iter()
        .flat_map_iter(|token| {
            catalog.all().iter().filter_map(move |location| {
                let score = score_match(token, location);
                (score > MIN_MATCH_SCORE).then(|| MatchCandidate {
                    location,
                    score,
                    matched_token: token.clone(),
                })
            })
        })
        .collect();

    // Stable: equal scores keep (token order, catalog order), except that an
    // exact name hit goes first.
    pairs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.is_exact_name().cmp(&a.is_exact_name()))
    });

    let mut seen = HashSet::new();
    pairs.retain(|candidate| seen.insert(candidate.location.code.as_str()));
    pairs.truncate(MAX_DISTINCT_MATCHES);
    pairs
}

fn build_suggestions(ranked: &[MatchCandidate<'_>], catalog: &Catalog, lexicon: &Lexicon) -> Vec<String> {
    let Some(primary) = ranked.first() else {
        return Vec::new();
    };
    let primary_name = primary.location.name.as_str();

    let same_category = catalog
        .by_category(primary.location.category)
        .into_iter()
        .filter(|location| location.code != primary.location.code)
        .take(SAME_CATEGORY_SUGGESTIONS)
        .map(|location| location.name.as_str());

    let runners_up = ranked
        .iter()
        .skip(1)
        .take(RUNNER_UP_SUGGESTIONS)
        .map(|candidate| candidate.location.name.as_str());

    let popular = lexicon.popular_suggestions.iter().filter_map(|entry| {
        catalog
            .all()
            .iter()
            .find(|location| location.name.contains(entry.as_str()))
            .map(|location| location.name.as_str())
    });

    let mut seen = HashSet::new();
    same_category
        .chain(runners_up)
        .chain(popular)
        .filter(|name| *name != primary_name)
        .filter(|name| seen.insert(*name))
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::record;
    use crate::catalog::Category;

    fn bundled() -> (Catalog, Lexicon) {
        (Catalog::bundled().unwrap(), Lexicon::default())
    }

    #[test]
    fn resolves_hongdae_congestion_question() {
        let (catalog, lexicon) = bundled();
        let resolution = resolve_query("홍대 혼잡도 어때?", &catalog, &lexicon);
        assert!(resolution.matched_location_name.contains("홍대"));
        assert!(resolution.confidence > 0.5);
        assert_eq!(resolution.extracted_token, "홍대");
        assert_eq!(resolution.original_query, "홍대 혼잡도 어때?");
    }

    #[test]
    fn unknown_place_has_zero_confidence() {
        let (catalog, lexicon) = bundled();
        let resolution = resolve_query("파리 혼잡도", &catalog, &lexicon);
        assert_eq!(resolution.confidence, 0.0);
        assert_eq!(resolution.extracted_token, "파리");
        assert_eq!(resolution.matched_location_name, "");
        assert_eq!(resolution.matched_location_code, None);
        assert!(resolution.suggestions.is_empty());
        assert!(!resolution.is_match());
    }

    #[test]
    fn empty_query_is_not_an_error() {
        let (catalog, lexicon) = bundled();
        let resolution = resolve_query("", &catalog, &lexicon);
        assert_eq!(resolution.extracted_token, "");
        assert_eq!(resolution.confidence, 0.0);

        let fillers = resolve_query("혼잡도 알려줘", &catalog, &lexicon);
        assert_eq!(fillers.extracted_token, "");
        assert_eq!(fillers.confidence, 0.0);
        assert!(!fillers.is_match());
    }

    #[test]
    fn every_bundled_name_resolves_to_itself() {
        let (catalog, lexicon) = bundled();
        for location in catalog.all() {
            let resolution = resolve_query(&location.name, &catalog, &lexicon);
            assert_eq!(resolution.matched_location_name, location.name, "query {}", location.name);
            assert_eq!(resolution.confidence, 1.0);
        }
    }

    #[test]
    fn exact_name_is_case_insensitive() {
        let (catalog, lexicon) = bundled();
        let resolution = resolve_query("ddp(동대문디자인플라자)", &catalog, &lexicon);
        assert_eq!(resolution.matched_location_name, "DDP(동대문디자인플라자)");
        assert_eq!(resolution.confidence, 1.0);
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        let (catalog, lexicon) = bundled();
        for query in ["강남역 지금 사람 많아?", "Gangnam", "한강", "서울숲 산책", "zzz", "역"] {
            let confidence = resolve_query(query, &catalog, &lexicon).confidence;
            assert!((0.0..=1.0).contains(&confidence), "{query}: {confidence}");
        }
    }

    #[test]
    fn suggestions_exclude_the_match() {
        let (catalog, lexicon) = bundled();
        for query in ["강남역", "남산공원 사람 많아?", "명동 관광특구", "경복궁"] {
            let resolution = resolve_query(query, &catalog, &lexicon);
            assert!(!resolution.suggestions.is_empty());
            assert!(resolution.suggestions.len() <= MAX_SUGGESTIONS);
            assert!(!resolution.suggestions.contains(&resolution.matched_location_name));
            let unique: HashSet<&String> = resolution.suggestions.iter().collect();
            assert_eq!(unique.len(), resolution.suggestions.len());
        }
    }

    #[test]
    fn suggestions_start_with_same_category() {
        let catalog = Catalog::new(vec![
            record("P1", "남산공원", Category::Park, &[]),
            record("P2", "서울숲공원", Category::Park, &[]),
            record("D1", "강남역", Category::DenseArea, &[]),
        ])
        .unwrap();
        let resolution = resolve_query("남산공원", &catalog, &Lexicon::default());
        assert_eq!(resolution.matched_location_name, "남산공원");
        assert_eq!(resolution.suggestions[0], "서울숲공원");
        // popular fill
        assert!(resolution.suggestions.contains(&"강남역".to_string()));
    }

    #[test]
    fn ranking_keeps_one_entry_per_location() {
        let (catalog, lexicon) = bundled();
        let tokens = extract_keywords("강남 역삼 선릉 삼성 강남역", &lexicon);
        let ranked = rank_matches(&tokens, &catalog);
        assert!(ranked.len() <= MAX_DISTINCT_MATCHES);
        let codes: HashSet<&str> = ranked.iter().map(|c| c.location.code.as_str()).collect();
        assert_eq!(codes.len(), ranked.len());
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn resolution_is_deterministic() {
        let (catalog, lexicon) = bundled();
        let first = resolve_query("이태원 지금 붐벼?", &catalog, &lexicon);
        let second = resolve_query("이태원 지금 붐벼?", &catalog, &lexicon);
        assert_eq!(first, second);
    }
}
