use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const LOCATION_SUFFIXES: &[&str] = &[
    "역", "공원", "시장", "거리", "광장", "궁", "동", "구", "로", "길", "타워", "센터", "몰", "플라자",
];

const STOP_WORDS: &[&str] = &[
    // particles
    "이", "가", "을", "를", "에", "에서", "으로", "로", "와", "과", "의", "은", "는",
    // generic predicates
    "이다", "있다", "없다", "하다", "되다", "같다", "다른", "많다", "적다",
    "좋다", "나쁘다", "크다", "작다", "높다", "낮다", "길다", "짧다",
    // pronouns and interrogatives
    "그", "그것", "이것", "저것", "여기", "거기", "저기", "어디", "언제", "누구",
    "무엇", "어떻게", "왜", "어떤", "몇", "얼마", "어느", "모든", "각각",
    // temporal
    "지금", "오늘", "어제", "내일", "요즘", "최근", "예전", "앞으로", "나중에",
    // domain filler
    "혼잡도", "혼잡", "붐빔", "사람", "많이", "적게", "어떤지",
    "알려줘", "알려주세요", "궁금해", "궁금합니다", "보여줘", "보여주세요",
    "찾아줘", "찾아주세요", "검색", "조회", "확인", "체크", "알아보기",
    "정도", "상황", "상태", "현재", "실시간", "예측", "예상",
];

const REALTIME_MARKERS: &[&str] = &["지금", "현재", "실시간", "요즘", "오늘"];
const PREDICTION_MARKERS: &[&str] = &["예측", "예상", "앞으로", "나중에", "미래", "내일"];
const CONGESTION_MARKERS: &[&str] = &["혼잡", "붐빔", "사람", "많이", "적게", "여유", "복잡"];

const DISTRICTS: &[&str] = &[
    "강남", "홍대", "명동", "이태원", "신촌", "건대", "잠실", "동대문", "종로", "청계",
    "가로수길", "인사동", "압구정", "신사", "논현", "역삼", "선릉", "삼성", "서초",
    "여의도", "마포", "용산", "성수", "왕십리", "을지로", "충무로", "동묘앞",
    "경복궁", "창덕궁", "덕수궁", "남산", "한강", "반포", "서울숲", "올림픽공원",
];

const WELL_KNOWN_REGIONS: &[&str] = &["강남", "홍대", "명동", "이태원", "신촌", "건대", "잠실"];

const NEIGHBORS: &[(&str, &[&str])] = &[
    ("명동", &["을지로", "충무로", "종로", "남대문", "중구", "회현", "시청"]),
    ("이태원", &["용산", "한남", "남산", "회현"]),
    ("홍대", &["신촌", "마포", "연남", "상수"]),
    ("강남", &["역삼", "논현", "신사", "압구정", "선릉", "삼성"]),
    ("동대문", &["을지로", "종로", "청계", "동묘앞"]),
    ("잠실", &["송파", "석촌", "올림픽공원"]),
    ("신촌", &["홍대", "마포", "연남", "이대"]),
];

const POPULAR_SUGGESTIONS: &[&str] = &[
    "강남역", "홍대입구역", "명동 관광특구", "이태원 관광특구",
    "남산공원", "한강공원", "경복궁", "동대문 관광특구",
];

const REALTIME_SPOTLIGHT: &[&str] = &["강남역", "홍대입구역", "명동 관광특구", "이태원역"];

/// Word tables consulted by the extractor, classifier and recommender.
///
/// Built once and shared read-only. A JSON file may override any subset of
/// the tables; omitted fields keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Lexicon {
    /// Locative suffixes in match-priority order.
    pub location_suffixes: Vec<String>,
    pub stop_words: HashSet<String>,
    pub realtime_markers: Vec<String>,
    pub prediction_markers: Vec<String>,
    pub congestion_markers: Vec<String>,
    /// District names tried in order when deriving a location's region.
    pub districts: Vec<String>,
    /// Regions that earn a flat bonus when two names share one.
    pub well_known_regions: Vec<String>,
    pub neighbors: BTreeMap<String, Vec<String>>,
    /// Suggestion fillers, matched by substring against location names.
    pub popular_suggestions: Vec<String>,
    /// Locations pushed into recommendations for realtime questions.
    pub realtime_spotlight: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            location_suffixes: owned(LOCATION_SUFFIXES),
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            realtime_markers: owned(REALTIME_MARKERS),
            prediction_markers: owned(PREDICTION_MARKERS),
            congestion_markers: owned(CONGESTION_MARKERS),
            districts: owned(DISTRICTS),
            well_known_regions: owned(WELL_KNOWN_REGIONS),
            neighbors: NEIGHBORS
                .iter()
                .map(|(region, near)| (region.to_string(), owned(near)))
                .collect(),
            popular_suggestions: owned(POPULAR_SUGGESTIONS),
            realtime_spotlight: owned(REALTIME_SPOTLIGHT),
        }
    }
}

impl Lexicon {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon {}", path.display()))?;
        let lexicon: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid lexicon JSON in {}", path.display()))?;
        Ok(lexicon)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn neighbors_of(&self, region: &str) -> &[String] {
        self.neighbors.get(region).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_keep_suffix_order() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.location_suffixes.first().map(String::as_str), Some("역"));
        assert_eq!(lexicon.location_suffixes.last().map(String::as_str), Some("플라자"));
    }

    #[test]
    fn filler_words_are_stop_words() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_stop_word("혼잡도"));
        assert!(lexicon.is_stop_word("알려줘"));
        assert!(!lexicon.is_stop_word("홍대"));
    }

    #[test]
    fn unknown_region_has_no_neighbors() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.neighbors_of("홍대").len(), 4);
        assert!(lexicon.neighbors_of("부산").is_empty());
    }

    #[test]
    fn partial_json_override_keeps_other_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "well_known_regions": ["성수"] }}"#).unwrap();

        let lexicon = Lexicon::from_json_file(file.path()).unwrap();
        assert_eq!(lexicon.well_known_regions, vec!["성수".to_string()]);
        assert_eq!(lexicon.districts, Lexicon::default().districts);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Lexicon::from_json_file(file.path()).is_err());
    }
}
