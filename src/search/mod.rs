pub mod fuzzy;
pub mod keywords;
pub mod resolver;
pub mod scoring;

use crate::catalog::LocationRecord;
use serde::Serialize;

/// One (token, location) pairing that cleared the match threshold.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    pub location: &'a LocationRecord,
    pub score: f64,
    pub matched_token: String,
}

impl MatchCandidate<'_> {
    pub fn is_exact_name(&self) -> bool {
        self.matched_token.to_lowercase() == self.location.name.to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryResolution {
    pub extracted_token: String,
    /// Empty when nothing in the catalog matched.
    pub matched_location_name: String,
    pub matched_location_code: Option<String>,
    pub confidence: f64,
    pub original_query: String,
    pub suggestions: Vec<String>,
}

impl QueryResolution {
    pub fn is_match(&self) -> bool {
        !self.matched_location_name.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FuzzyMatch<'a> {
    pub location: &'a LocationRecord,
    pub score: f64,
}
