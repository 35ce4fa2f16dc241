//! Frequency-based keyphrase extraction.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "is",
    "are", "was", "were", "be", "been", "being",
];

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_MIN_TOKEN_CHARS: usize = 4;

/// Word tokens of `text` in order of appearance.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

/// Picks the most frequent content words of a text.
#[derive(Debug, Clone, Copy)]
pub struct KeyphraseExtractor {
    pub top_n: usize,
    /// Tokens shorter than this many characters are ignored.
    pub min_token_chars: usize,
}

impl Default for KeyphraseExtractor {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_token_chars: DEFAULT_MIN_TOKEN_CHARS,
        }
    }
}

impl KeyphraseExtractor {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::default()
        }
    }

    pub fn with_min_token_chars(mut self, min_token_chars: usize) -> Self {
        self.min_token_chars = min_token_chars;
        self
    }

    /// Top tokens by descending count; ties keep first-occurrence order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for token in words(&lower) {
            if STOPWORDS.contains(&token) || token.chars().count() < self.min_token_chars {
                continue;
            }
            let count = counts.entry(token).or_insert(0);
            if *count == 0 {
                order.push(token);
            }
            *count += 1;
        }
        // stable sort keeps first-seen order among equal counts
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));
        order
            .into_iter()
            .take(self.top_n)
            .map(str::to_string)
            .collect()
    }
}
