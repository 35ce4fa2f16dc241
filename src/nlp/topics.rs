//! Rule-based multi-label topic assignment over a fixed theme taxonomy.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TopicError;

/// One theme attached to a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment {
    #[serde(rename = "themeId")]
    pub theme_id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub weight: f64,
}

/// Contract for anything that labels a batch of texts with themes.
///
/// Output is positionally aligned with the input and every entry is non-empty.
pub trait TopicStrategy: Send + Sync {
    fn assign(&self, texts: &[String]) -> Result<Vec<Vec<TopicAssignment>>, TopicError>;
}

struct ThemeRule {
    id: &'static str,
    name: &'static str,
    weight: f64,
    triggers: &'static [&'static str],
}

impl ThemeRule {
    fn matches(&self, lower: &str) -> bool {
        self.triggers.iter().any(|trigger| lower.contains(trigger))
    }

    fn assignment(&self) -> TopicAssignment {
        TopicAssignment {
            theme_id: self.id.to_string(),
            display_name: self.name.to_string(),
            weight: self.weight,
        }
    }
}

// priority order of themes within one assignment
const RULES: &[ThemeRule] = &[
    ThemeRule {
        id: "safety",
        name: "Public Safety",
        weight: 0.8,
        triggers: &["crime", "police", "shooting", "theft"],
    },
    ThemeRule {
        id: "transit",
        name: "Transportation",
        weight: 0.8,
        triggers: &["metro", "bus", "traffic", "transit", "parking"],
    },
    ThemeRule {
        id: "education",
        name: "Education",
        weight: 0.8,
        triggers: &["school", "education", "teacher", "student"],
    },
    ThemeRule {
        id: "housing",
        name: "Housing",
        weight: 0.8,
        triggers: &["housing", "rent", "apartment", "eviction"],
    },
    ThemeRule {
        id: "events",
        name: "Community Events",
        weight: 0.7,
        triggers: &["event", "meeting", "gathering", "celebration"],
    },
];

const FALLBACK: ThemeRule = ThemeRule {
    id: "general",
    name: "General",
    weight: 0.5,
    triggers: &[],
};

/// Keyword trigger rules. Texts are independent, so batches run in parallel.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordTopicAssigner;

impl KeywordTopicAssigner {
    pub fn assign_one(&self, text: &str) -> Vec<TopicAssignment> {
        let lower = text.to_lowercase();
        let mut themes: Vec<TopicAssignment> = RULES
            .iter()
            .filter(|rule| rule.matches(&lower))
            .map(ThemeRule::assignment)
            .collect();
        if themes.is_empty() {
            themes.push(FALLBACK.assignment());
        }
        themes
    }
}

impl TopicStrategy for KeywordTopicAssigner {
    fn assign(&self, texts: &[String]) -> Result<Vec<Vec<TopicAssignment>>, TopicError> {
        Ok(texts.par_iter().map(|text| self.assign_one(text)).collect())
    }
}
