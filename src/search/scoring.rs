use crate::catalog::LocationRecord;

// Calibration constants. Near-exact name and keyword hits must always outrank
// edit-distance similarity.
pub const EXACT_NAME_SCORE: f64 = 1.0;
pub const NAME_SUBSTRING_SCORE: f64 = 0.9;
pub const ENGLISH_SUBSTRING_SCORE: f64 = 0.8;
pub const KEYWORD_EXACT_SCORE: f64 = 0.95;
pub const KEYWORD_SUBSTRING_SCORE: f64 = 0.85;
pub const NAME_EDIT_WEIGHT: f64 = 0.6;
pub const ENGLISH_EDIT_WEIGHT: f64 = 0.5;
pub const KEYWORD_EDIT_WEIGHT: f64 = 0.4;
pub const LENGTH_BONUS_GATE: f64 = 0.7;
pub const LENGTH_BONUS_DIVISOR: f64 = 20.0;

/// Scores one candidate token against one location, in `[0, 1]`.
pub fn score_match(token: &str, location: &LocationRecord) -> f64 {
    let token_lower = token.to_lowercase();
    let name_lower = location.name.to_lowercase();

    if name_lower == token_lower {
        return EXACT_NAME_SCORE;
    }

    let mut best: f64 = 0.0;

    if name_lower.contains(&token_lower) {
        best = best.max(NAME_SUBSTRING_SCORE);
    }

    if let Some(english) = &location.english_name {
        if english.to_lowercase().contains(&token_lower) {
            best = best.max(ENGLISH_SUBSTRING_SCORE);
        }
    }

    for keyword in &location.keywords {
        let keyword_lower = keyword.to_lowercase();
        if keyword_lower == token_lower {
            best = best.max(KEYWORD_EXACT_SCORE);
        } else if keyword_lower.contains(&token_lower) {
            best = best.max(KEYWORD_SUBSTRING_SCORE);
        }
    }

    best = best.max(edit_similarity(token, &location.name) * NAME_EDIT_WEIGHT);

    if let Some(english) = &location.english_name {
        best = best.max(edit_similarity(token, english) * ENGLISH_EDIT_WEIGHT);
    }

    let keyword_similarity = location
        .keywords
        .iter()
        .map(|keyword| edit_similarity(token, keyword))
        .fold(0.0, f64::max);
    best = best.max(keyword_similarity * KEYWORD_EDIT_WEIGHT);

    if best > LENGTH_BONUS_GATE {
        best += token.chars().count() as f64 / LENGTH_BONUS_DIVISOR;
    }

    best.min(1.0)
}

/// `1 - levenshtein / max_len` over lower-cased characters.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(&a, &b)
}
