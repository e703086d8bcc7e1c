pub mod loader;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "관광특구")]
    TouristZone,
    #[serde(rename = "고궁·문화유산")]
    HeritageSite,
    #[serde(rename = "인구밀집지역")]
    DenseArea,
    #[serde(rename = "발달상권")]
    CommercialDistrict,
    #[serde(rename = "공원")]
    Park,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::TouristZone,
        Self::HeritageSite,
        Self::DenseArea,
        Self::CommercialDistrict,
        Self::Park,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TouristZone => "관광특구",
            Self::HeritageSite => "고궁·문화유산",
            Self::DenseArea => "인구밀집지역",
            Self::CommercialDistrict => "발달상권",
            Self::Park => "공원",
        }
    }

    pub fn parse_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }

    /// Extra search keywords every location of this category receives.
    pub fn search_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::TouristZone => &["관광", "특구", "여행", "투어"],
            Self::HeritageSite => &["고궁", "궁궐", "문화유산", "유적", "전통", "역사"],
            Self::DenseArea => &["역", "지하철", "전철", "교통", "번화가"],
            Self::CommercialDistrict => &["상권", "쇼핑", "상가", "시장", "거리", "먹거리"],
            Self::Park => &["공원", "자연", "산책", "휴식", "녹지", "운동"],
        }
    }

    pub fn info(&self) -> CategoryInfo {
        let (description, icon, color) = match self {
            Self::TouristZone => ("서울의 대표적인 관광 명소들", "🏛️", "#3B82F6"),
            Self::HeritageSite => ("전통 문화와 역사가 살아있는 곳", "🏯", "#8B5CF6"),
            Self::DenseArea => ("지하철역 주변 번화가", "🚇", "#EF4444"),
            Self::CommercialDistrict => ("쇼핑과 먹거리가 풍부한 상권", "🛍️", "#F59E0B"),
            Self::Park => ("자연과 휴식을 즐길 수 있는 공간", "🌳", "#10B981"),
        };
        CategoryInfo {
            category: *self,
            name: self.label().to_string(),
            display_name: self.label().to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInfo {
    pub category: Category,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

/// One named place. Aliases accept the camelCase field names of pre-generated
/// place lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationRecord {
    #[serde(alias = "areaCode")]
    pub code: String,
    #[serde(alias = "areaName")]
    pub name: String,
    #[serde(default, alias = "displayName")]
    pub display_name: String,
    #[serde(default, alias = "engName")]
    pub english_name: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl LocationRecord {
    /// True when any keyword contains `needle`, both sides lower-cased.
    pub fn keyword_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.keywords.iter().any(|k| k.to_lowercase().contains(&needle))
    }

    /// Case-insensitive substring match on name, english name or any keyword.
    /// `term` must already be lower-cased.
    fn mentions(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self
                .english_name
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(term))
            || self.keywords.iter().any(|k| k.to_lowercase().contains(term))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_locations: usize,
    pub categories: BTreeMap<Category, usize>,
}

/// Immutable set of known locations, indexed by code and by category.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<LocationRecord>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_category: HashMap<Category, Vec<usize>>,
}

impl Catalog {
    pub fn new(records: Vec<LocationRecord>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(records.len());
        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();

        for record in records {
            let record = normalize(record);
            if record.code.is_empty() || record.name.is_empty() {
                bail!("location record is missing a code or name: {record:?}");
            }
            let idx = normalized.len();
            if by_code.insert(record.code.clone(), idx).is_some() {
                bail!("duplicate location code: {}", record.code);
            }
            by_name.entry(record.name.clone()).or_insert(idx);
            by_category.entry(record.category).or_default().push(idx);
            normalized.push(record);
        }

        info!(
            locations = normalized.len(),
            categories = by_category.len(),
            "Catalog indexed"
        );

        Ok(Self {
            records: normalized,
            by_code,
            by_name,
            by_category,
        })
    }

    /// The Seoul real-time city-data hotspots shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::new(loader::parse_tsv(loader::BUNDLED_SEOUL_PLACES)?)
    }

    pub fn all(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_code(&self, code: &str) -> Option<&LocationRecord> {
        self.by_code.get(code).map(|&idx| &self.records[idx])
    }

    pub fn by_name(&self, name: &str) -> Option<&LocationRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    pub fn by_category(&self, category: Category) -> Vec<&LocationRecord> {
        self.by_category
            .get(&category)
            .map(|idxs| idxs.iter().map(|&idx| &self.records[idx]).collect())
            .unwrap_or_default()
    }

    pub fn search_keyword(&self, term: &str) -> Vec<&LocationRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.records.iter().filter(|r| r.mentions(&term)).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let categories = self
            .by_category
            .iter()
            .map(|(category, idxs)| (*category, idxs.len()))
            .collect();
        CatalogStats {
            total_locations: self.records.len(),
            categories,
        }
    }
}

fn normalize(mut record: LocationRecord) -> LocationRecord {
    record.code = record.code.trim().to_string();
    record.name = record.name.trim().to_string();
    if record.display_name.trim().is_empty() {
        record.display_name = record.name.clone();
    }
    record.english_name = record
        .english_name
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let mut seen = HashSet::new();
    let mut keywords = Vec::with_capacity(record.keywords.len() + 1);
    for keyword in std::iter::once(record.name.clone()).chain(record.keywords) {
        if !keyword.is_empty() && seen.insert(keyword.clone()) {
            keywords.push(keyword);
        }
    }
    record.keywords = keywords;
    record
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(code: &str, name: &str, category: Category, keywords: &[&str]) -> LocationRecord {
        LocationRecord {
            code: code.to_string(),
            name: name.to_string(),
            display_name: String::new(),
            english_name: None,
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn bundled_catalog_has_all_hotspots() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 120);
        assert_eq!(catalog.by_code("POI014").unwrap().name, "강남역");
        assert_eq!(catalog.by_code("POI091").unwrap().name, "남산공원");
        assert!(catalog.by_code("INVALID").is_none());
    }

    #[test]
    fn category_index_preserves_catalog_order() {
        let catalog = Catalog::bundled().unwrap();
        let zones = catalog.by_category(Category::TouristZone);
        assert_eq!(zones.len(), 7);
        assert!(zones.iter().all(|r| r.category == Category::TouristZone));
        assert_eq!(zones[0].code, "POI001");
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let records = vec![
            record("A1", "서울역", Category::DenseArea, &[]),
            record("A1", "강남역", Category::DenseArea, &[]),
        ];
        let err = Catalog::new(records).unwrap_err();
        assert!(err.to_string().contains("duplicate location code"));
    }

    #[test]
    fn missing_name_is_rejected() {
        let records = vec![record("A1", "  ", Category::Park, &[])];
        assert!(Catalog::new(records).is_err());
    }

    #[test]
    fn keywords_always_include_name() {
        let catalog = Catalog::new(vec![record("A1", "노들섬", Category::Park, &["섬", "노들섬"])]).unwrap();
        let keywords = &catalog.by_code("A1").unwrap().keywords;
        assert_eq!(keywords, &vec!["노들섬".to_string(), "섬".to_string()]);
    }

    #[test]
    fn empty_english_name_becomes_none() {
        let mut rec = record("A1", "서촌", Category::CommercialDistrict, &[]);
        rec.english_name = Some("  ".to_string());
        let catalog = Catalog::new(vec![rec]).unwrap();
        let stored = catalog.by_code("A1").unwrap();
        assert_eq!(stored.english_name, None);
        assert_eq!(stored.display_name, "서촌");
    }

    #[test]
    fn keyword_search_is_case_insensitive() {
        let catalog = Catalog::bundled().unwrap();
        let korean = catalog.search_keyword("강남");
        let latin = catalog.search_keyword("GANGNAM");
        assert!(!korean.is_empty());
        assert!(!latin.is_empty());
        assert!(korean
            .iter()
            .all(|r| r.name.contains("강남") || r.keywords.iter().any(|k| k.contains("강남"))));
    }

    #[test]
    fn keyword_search_misses_return_empty() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.search_keyword("존재하지않는장소").is_empty());
        assert!(catalog.search_keyword("   ").is_empty());
    }

    #[test]
    fn stats_count_every_category() {
        let stats = Catalog::bundled().unwrap().stats();
        assert_eq!(stats.total_locations, 120);
        assert_eq!(stats.categories.len(), 5);
        assert_eq!(stats.categories.values().sum::<usize>(), 120);
        assert_eq!(stats.categories[&Category::TouristZone], 7);
    }

    #[test]
    fn category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse_label(category.label()), Some(category));
            assert_eq!(category.info().name, category.label());
        }
        assert_eq!(Category::parse_label("invalid"), None);
    }
}
