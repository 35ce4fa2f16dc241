//! Gazetteer and pattern based entity recognizer for District local news.
//! Emits spaCy-style type codes; the entities adapter maps them to categories.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::ModelError,
    nlp::backend::{InferenceBackend, RawEntity, RawOutput},
};

/// Recognized mention with byte offsets relative to the source text.
#[derive(Debug, Clone)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub code: &'static str,
    pub text: String,
}

static PLACE_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Washington",
        "District of Columbia",
        "Anacostia",
        "Georgetown",
        "Navy Yard",
        "Capitol Hill",
        "Dupont Circle",
        "Adams Morgan",
        "Columbia Heights",
        "Petworth",
        "Brookland",
        "Foggy Bottom",
        "Shaw",
        "Chinatown",
        "Congress Heights",
        "Deanwood",
        "Logan Circle",
        "Southwest Waterfront",
    ]
});

static ORG_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "WMATA",
        "Metro Transit Police",
        "Metropolitan Police Department",
        "MPD",
        "DC Public Schools",
        "DCPS",
        "DDOT",
        "DC Council",
        "DC Water",
        "Pepco",
        "Capital Bikeshare",
        "Howard University",
        "Georgetown University",
        "Gallaudet University",
    ]
});

static FACILITY_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Union Station",
        "Nationals Park",
        "Capital One Arena",
        "RFK Stadium",
        "Eastern Market",
        "MLK Library",
    ]
});

static DATE_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ]
});

static WARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bWard [1-8]\b").expect("valid regex"));

static PERSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Mayor|Councilmember|Chief|Officer|Detective|Principal|Dr\.|Mr\.|Mrs\.|Ms\.)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)",
    )
    .expect("valid regex")
});

static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{1,5}\s+(?:[A-Z0-9][A-Za-z0-9]*\s+){1,3}(?:St|Street|Ave|Avenue|Rd|Road|Blvd|Boulevard|Pl|Place|Dr|Drive|Ter|Terrace|Way|Ct|Court)\b(?:\s+(?:NW|NE|SW|SE)\b)?",
    )
    .expect("valid regex")
});

#[derive(Debug, Default)]
pub struct GazetteerNer;

impl GazetteerNer {
    pub fn new() -> Self {
        Self
    }

    /// All non-overlapping spans, longest match first at each position.
    pub fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        spans.extend(find_terms(text, &PLACE_TERMS, "GPE"));
        spans.extend(find_terms(text, &ORG_TERMS, "ORG"));
        spans.extend(find_terms(text, &FACILITY_TERMS, "FAC"));
        spans.extend(find_terms(text, &DATE_TERMS, "DATE"));
        spans.extend(find_pattern(text, &WARD, 0, "LOC"));
        spans.extend(find_pattern(text, &PERSON, 1, "PERSON"));
        spans.extend(find_pattern(text, &ADDRESS, 0, "ADDRESS"));
        resolve_overlaps(spans)
    }
}

impl InferenceBackend for GazetteerNer {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError> {
        let entities = self
            .spans(text)
            .into_iter()
            .map(|span| RawEntity {
                text: span.text,
                code: span.code.to_string(),
            })
            .collect();
        Ok(RawOutput::Entities(entities))
    }
}

fn find_terms(text: &str, terms: &[&str], code: &'static str) -> Vec<Span> {
    let mut spans = Vec::new();
    for term in terms {
        let mut start_pos = 0;
        while let Some(pos) = text[start_pos..].find(term) {
            let start = start_pos + pos;
            let end = start + term.len();
            if on_word_boundary(text, start, end) {
                spans.push(Span {
                    start,
                    end,
                    code,
                    text: text[start..end].to_string(),
                });
            }
            start_pos = end;
        }
    }
    spans
}

fn find_pattern(text: &str, pattern: &Regex, group: usize, code: &'static str) -> Vec<Span> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(group))
        .map(|m| Span {
            start: m.start(),
            end: m.end(),
            code,
            text: m.as_str().to_string(),
        })
        .collect()
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn resolve_overlaps(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then((b.end - b.start).cmp(&(a.end - a.start))));
    let mut kept: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().is_some_and(|last| span.start < last.end) {
            continue;
        }
        kept.push(span);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(text: &str) -> Vec<(String, &'static str)> {
        GazetteerNer::new()
            .spans(text)
            .into_iter()
            .map(|s| (s.text, s.code))
            .collect()
    }

    #[test]
    fn longest_term_wins_overlaps() {
        let found = codes("Students at Georgetown University rallied in Georgetown.");
        assert_eq!(
            found,
            vec![
                ("Georgetown University".to_string(), "ORG"),
                ("Georgetown".to_string(), "GPE"),
            ]
        );
    }

    #[test]
    fn terms_respect_word_boundaries() {
        assert!(codes("Shawn walked home").is_empty());
        assert_eq!(codes("Meet in Shaw")[0].1, "GPE");
    }

    #[test]
    fn patterns_capture_people_addresses_and_wards() {
        let found = codes("Councilmember Janeese Lewis George toured 4500 Georgia Ave NW in Ward 4.");
        assert!(found.contains(&("Janeese Lewis".to_string(), "PERSON")));
        assert!(found.contains(&("4500 Georgia Ave NW".to_string(), "ADDRESS")));
        assert!(found.contains(&("Ward 4".to_string(), "LOC")));
    }
}
