use crate::catalog::{Category, LocationRecord};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

pub const BUNDLED_SEOUL_PLACES: &str = include_str!("../../data/seoul_places.tsv");

const KOREAN_NAME_SUFFIXES: &[&str] = &[
    "역", "공원", "시장", "거리", "광장", "궁", "관광특구", "한강공원", "일대",
];
const ENGLISH_NAME_SUFFIXES: &[&str] = &[
    "station", "Station", "Park", "Market", "Street", "Square", "Palace", "Zone",
];
const KOREAN_NAME_SEPARATORS: &[char] = &['·', '&', ',', '(', ')', '-', ' '];

/// Loads location records from a `.json` list or a tab-separated place table.
pub fn load_path(path: &Path) -> Result<Vec<LocationRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;

    let records = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&raw)
            .with_context(|| format!("invalid catalog JSON in {}", path.display()))?,
        _ => parse_tsv(&raw)?,
    };

    info!(path = %path.display(), records = records.len(), "Loaded catalog file");
    Ok(records)
}

pub fn parse_json(raw: &str) -> Result<Vec<LocationRecord>> {
    Ok(serde_json::from_str(raw)?)
}

/// Parses `category \t no \t code \t name \t english_name` rows after a header
/// line. Incomplete rows and unknown categories are skipped.
pub fn parse_tsv(raw: &str) -> Result<Vec<LocationRecord>> {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
    if lines.next().is_none() {
        bail!("place table is empty");
    }

    let mut records = Vec::new();
    for (row, line) in lines.enumerate() {
        let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
        if columns.len() < 4 || columns[0].is_empty() || columns[2].is_empty() || columns[3].is_empty() {
            continue;
        }

        let Some(category) = Category::parse_label(columns[0]) else {
            warn!(row = row + 1, category = columns[0], "Skipping row with unknown category");
            continue;
        };

        let name = columns[3].to_string();
        let english_name = columns
            .get(4)
            .filter(|e| !e.is_empty())
            .map(|e| e.to_string());
        let keywords = generate_keywords(&name, english_name.as_deref(), category);

        records.push(LocationRecord {
            code: columns[2].to_string(),
            display_name: name.clone(),
            name,
            english_name,
            category,
            keywords,
        });
    }

    Ok(records)
}

/// Search keywords for a place: its names, name fragments and category terms.
pub fn generate_keywords(name: &str, english_name: Option<&str>, category: Category) -> Vec<String> {
    let mut keywords = KeywordSet::default();

    keywords.push(name);
    if let Some(english) = english_name {
        keywords.push(english);
    }

    for keyword in korean_name_keywords(name) {
        keywords.push(&keyword);
    }
    if let Some(english) = english_name {
        for keyword in english_name_keywords(english) {
            keywords.push(&keyword);
        }
    }
    for keyword in category.search_keywords() {
        keywords.push(keyword);
    }

    keywords.into_vec()
}

fn korean_name_keywords(name: &str) -> Vec<String> {
    let mut keywords = Vec::new();

    if let Some(stem) = KOREAN_NAME_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
    {
        keywords.push(stem.trim().to_string());
    }

    keywords.extend(
        name.split(KOREAN_NAME_SEPARATORS)
            .map(str::trim)
            .filter(|part| part.chars().count() >= 2)
            .map(str::to_string),
    );
    keywords
}

fn english_name_keywords(name: &str) -> Vec<String> {
    let mut keywords = Vec::new();

    if let Some(stem) = ENGLISH_NAME_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
    {
        keywords.push(stem.trim().to_string());
    }

    for word in name
        .split(|c: char| c.is_whitespace() || "&·(),.-".contains(c))
        .filter(|w| w.chars().count() >= 2)
    {
        keywords.push(word.to_string());
        keywords.push(word.to_lowercase());
    }
    keywords
}

#[derive(Default)]
struct KeywordSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl KeywordSet {
    fn push(&mut self, keyword: &str) {
        if !keyword.is_empty() && self.seen.insert(keyword.to_string()) {
            self.ordered.push(keyword.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
