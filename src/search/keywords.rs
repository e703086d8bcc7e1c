// Regexes below are literals and always compile.
#![allow(clippy::expect_used)]

use crate::lexicon::Lexicon;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const MIN_TOKEN_CHARS: usize = 2;

static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("static regex: word run"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,.\-·&()]+").expect("static regex: separators"));
static HANGUL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]{2,}").expect("static regex: hangul run"));
static LATIN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]{2,}").expect("static regex: latin run"));

/// Candidate location tokens for a free-form query, deduplicated in the order
/// they were found.
///
/// Sources, in order: locative-suffix spans, separator-split words with their
/// adjacent bigrams and trigrams, Hangul runs, Latin runs (lower-cased and
/// capitalized), and finally the whole query when any word survived the
/// stop-word filter. Tokens shorter than two characters are dropped.
pub fn extract_keywords(query: &str, lexicon: &Lexicon) -> Vec<String> {
    let clean = query.trim().to_lowercase();
    if clean.is_empty() {
        return Vec::new();
    }

    let mut tokens = TokenSet::default();

    for run in WORD_RUN.find_iter(&clean) {
        if let Some((span, stem)) = suffix_split(run.as_str(), &lexicon.location_suffixes) {
            tokens.insert(span);
            tokens.insert(stem);
        }
    }

    let words: Vec<&str> = SEPARATORS
        .split(&clean)
        .filter(|w| !w.is_empty())
        .filter(|w| !lexicon.is_stop_word(w))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .collect();
    for (i, word) in words.iter().enumerate() {
        tokens.insert(word);
        if let Some(next) = words.get(i + 1) {
            tokens.insert(&format!("{word}{next}"));
            if let Some(after) = words.get(i + 2) {
                tokens.insert(&format!("{word}{next}{after}"));
            }
        }
    }

    for run in HANGUL_RUN.find_iter(&clean) {
        if !lexicon.is_stop_word(run.as_str()) {
            tokens.insert(run.as_str());
        }
    }

    for run in LATIN_RUN.find_iter(&clean) {
        let lower = run.as_str().to_lowercase();
        tokens.insert(&lower);
        tokens.insert(&capitalize(&lower));
    }

    // A query made only of filler words yields no candidates at all.
    if !words.is_empty() {
        tokens.insert(&clean);
    }
    tokens.into_vec()
}

/// Splits a word run at the first suffix (in table order) that follows at
/// least one character. The span runs through the suffix's last occurrence.
fn suffix_split<'r>(run: &'r str, suffixes: &[String]) -> Option<(&'r str, &'r str)> {
    suffixes.iter().find_map(|suffix| {
        let pos = run.rfind(suffix.as_str())?;
        (pos > 0).then(|| (&run[..pos + suffix.len()], &run[..pos]))
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Default)]
struct TokenSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl TokenSet {
    fn insert(&mut self, token: &str) {
        if token.chars().count() >= MIN_TOKEN_CHARS && self.seen.insert(token.to_string()) {
            self.ordered.push(token.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
