pub mod catalog;
pub mod intent;
pub mod lexicon;
pub mod recommend;
pub mod search;

use crate::catalog::{Catalog, LocationRecord};
use crate::intent::IntentAnalysis;
use crate::lexicon::Lexicon;
use crate::recommend::Recommender;
use crate::search::{FuzzyMatch, QueryResolution};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Similarity floor for the fuzzy matches bundled into an intelligent search.
pub const INTELLIGENT_FUZZY_THRESHOLD: f64 = 0.2;

/// Everything one query produces: the resolved location, bigram look-alikes,
/// the question's intent and follow-up recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct IntelligentSearch<'a> {
    pub resolution: QueryResolution,
    pub fuzzy_matches: Vec<FuzzyMatch<'a>>,
    pub intent: IntentAnalysis,
    pub recommendations: Vec<&'a LocationRecord>,
}

#[derive(Clone)]
pub struct LocatorEngine {
    catalog: Arc<Catalog>,
    lexicon: Arc<Lexicon>,
}

impl LocatorEngine {
    pub fn new(catalog: Catalog, lexicon: Lexicon) -> Self {
        Self {
            catalog: Arc::new(catalog),
            lexicon: Arc::new(lexicon),
        }
    }

    /// Bundled Seoul hotspots with the default word tables.
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(Catalog::bundled()?, Lexicon::default()))
    }

    /// Builds an engine from optional catalog and lexicon files, falling back
    /// to the bundled data for whichever is absent.
    pub fn from_paths(catalog_path: Option<&Path>, lexicon_path: Option<&Path>) -> Result<Self> {
        let catalog = match catalog_path {
            Some(path) => Catalog::new(catalog::loader::load_path(path)?)?,
            None => Catalog::bundled()?,
        };
        let lexicon = match lexicon_path {
            Some(path) => {
                info!(path = %path.display(), "Loading lexicon override");
                Lexicon::from_json_file(path)?
            }
            None => Lexicon::default(),
        };
        Ok(Self::new(catalog, lexicon))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn extract_keywords(&self, query: &str) -> Vec<String> {
        search::keywords::extract_keywords(query, &self.lexicon)
    }

    pub fn resolve_query(&self, query: &str) -> QueryResolution {
        search::resolver::resolve_query(query, &self.catalog, &self.lexicon)
    }

    pub fn fuzzy_search(&self, query: &str, threshold: f64) -> Vec<FuzzyMatch<'_>> {
        search::fuzzy::fuzzy_search(query, &self.catalog, threshold)
    }

    pub fn classify_intent(&self, query: &str) -> IntentAnalysis {
        intent::classify_intent(query, &self.lexicon)
    }

    pub fn recommend(
        &self,
        resolution: &QueryResolution,
        intent: &IntentAnalysis,
    ) -> Vec<&LocationRecord> {
        Recommender::new(&self.catalog, &self.lexicon).recommend(resolution, intent)
    }

    pub fn intelligent_search(&self, query: &str) -> IntelligentSearch<'_> {
        let resolution = self.resolve_query(query);
        let fuzzy_matches = self.fuzzy_search(query, INTELLIGENT_FUZZY_THRESHOLD);
        let intent = self.classify_intent(query);
        let recommendations = self.recommend(&resolution, &intent);
        IntelligentSearch {
            resolution,
            fuzzy_matches,
            intent,
            recommendations,
        }
    }
}
