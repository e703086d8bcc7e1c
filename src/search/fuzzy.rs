use crate::catalog::{Catalog, LocationRecord};
use crate::search::FuzzyMatch;
use rayon::prelude::*;
use std::collections::HashSet;

/// Catalog locations whose best bigram-Jaccard similarity to `query` is at
/// least `threshold`, best first. Equal scores keep catalog order.
pub fn fuzzy_search<'a>(query: &str, catalog: &'a Catalog, threshold: f64) -> Vec<FuzzyMatch<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<FuzzyMatch<'a>> = catalog
        .all()
        .par_iter()
        .filter_map(|location| {
            let score = best_similarity(&query, location);
            (score >= threshold).then_some(FuzzyMatch { location, score })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

fn best_similarity(query: &str, location: &LocationRecord) -> f64 {
    std::iter::once(location.name.as_str())
        .chain(location.english_name.as_deref())
        .chain(location.keywords.iter().map(String::as_str))
        .map(|text| bigram_similarity(query, &text.to_lowercase()))
        .fold(0.0, f64::max)
}

/// Jaccard similarity of the two strings' character bigram sets.
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let left = bigrams(a);
    let right = bigrams(b);
    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

fn bigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 {
        return HashSet::from([text.to_string()]);
    }
    chars.windows(2).map(|pair| pair.iter().collect()).collect()
}
