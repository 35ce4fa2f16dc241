//! Analyzer adapters: truncation, label normalization and failure capture
//! around the registry's model handles.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use serde::Serialize;

use crate::{
    error::ModelError,
    nlp::{
        backend::{RawEntity, RawLabel, RawOutput},
        registry::{AnalyzerKind, ModelRegistry},
    },
};

/// Character budget for the sequence classifiers.
pub const CLASSIFIER_CHAR_LIMIT: usize = 512;
/// Character budget for entity recognition.
pub const ENTITY_CHAR_LIMIT: usize = 1000;

/// Tagged result of one analyzer invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failed(ModelError),
}

impl<T> Outcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    fn from_result(result: Result<T, ModelError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment {
        label: SentimentLabel::Neutral,
        score: 0.5,
    };
}

/// Open emotion vocabulary; keys come from the model's label set.
pub type EmotionScores = BTreeMap<String, f64>;

/// Entity surface forms grouped into the four output categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    pub places: BTreeSet<String>,
    pub organizations: BTreeSet<String>,
    pub people: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
}

impl Entities {
    fn bucket(&mut self, code: &str) -> Option<&mut BTreeSet<String>> {
        match code {
            "GPE" | "LOC" => Some(&mut self.places),
            "ORG" => Some(&mut self.organizations),
            "PERSON" | "PER" => Some(&mut self.people),
            "FAC" | "ADDRESS" => Some(&mut self.addresses),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
            && self.organizations.is_empty()
            && self.people.is_empty()
            && self.addresses.is_empty()
    }
}

/// One facet of the enrichment record produced from a model.
pub trait Analyzer: Send + Sync {
    type Output: Clone + Send;

    fn kind(&self) -> AnalyzerKind;

    /// Value for empty input and for failed invocations.
    fn neutral(&self) -> Self::Output;

    fn analyze(&self, text: &str) -> Outcome<Self::Output>;
}

/// First `limit` characters of `text`; never splits a code point.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn round3(score: f64) -> f64 {
    (score.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Shared adapter path: skip blank input, truncate, infer, normalize.
fn run<T>(
    registry: &ModelRegistry,
    kind: AnalyzerKind,
    text: &str,
    limit: usize,
    neutral: T,
    normalize: impl FnOnce(RawOutput) -> Result<T, ModelError>,
) -> Outcome<T> {
    if text.trim().is_empty() {
        return Outcome::Success(neutral);
    }
    let input = truncate_chars(text, limit);
    Outcome::from_result(
        registry
            .get_or_create(kind)
            .and_then(|model| model.infer(input))
            .and_then(normalize),
    )
}

fn expect_labels(kind: AnalyzerKind, raw: RawOutput) -> Result<Vec<RawLabel>, ModelError> {
    match raw {
        RawOutput::Labels(labels) => Ok(labels),
        RawOutput::Entities(_) => Err(ModelError::malformed(kind, "expected labels, got entities")),
    }
}

fn checked_score(kind: AnalyzerKind, label: &RawLabel) -> Result<f64, ModelError> {
    if label.score.is_finite() {
        Ok(round3(label.score))
    } else {
        Err(ModelError::malformed(
            kind,
            format!("non-finite score for label {}", label.label),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    registry: Arc<ModelRegistry>,
}

impl SentimentAnalyzer {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

impl Analyzer for SentimentAnalyzer {
    type Output = Sentiment;

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Sentiment
    }

    fn neutral(&self) -> Sentiment {
        Sentiment::NEUTRAL
    }

    fn analyze(&self, text: &str) -> Outcome<Sentiment> {
        let kind = self.kind();
        run(&self.registry, kind, text, CLASSIFIER_CHAR_LIMIT, self.neutral(), |raw| {
            let labels = expect_labels(kind, raw)?;
            // the top-scoring label is the prediction
            let top = labels
                .iter()
                .filter(|l| l.score.is_finite())
                .max_by(|a, b| a.score.total_cmp(&b.score))
                .ok_or_else(|| ModelError::malformed(kind, "no labels"))?;
            let label = match top.label.to_lowercase().as_str() {
                "positive" => SentimentLabel::Positive,
                "negative" => SentimentLabel::Negative,
                _ => return Ok(Sentiment::NEUTRAL),
            };
            Ok(Sentiment {
                label,
                score: checked_score(kind, top)?,
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct EmotionAnalyzer {
    registry: Arc<ModelRegistry>,
}

impl EmotionAnalyzer {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

impl Analyzer for EmotionAnalyzer {
    type Output = EmotionScores;

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Emotion
    }

    fn neutral(&self) -> EmotionScores {
        EmotionScores::new()
    }

    fn analyze(&self, text: &str) -> Outcome<EmotionScores> {
        let kind = self.kind();
        run(&self.registry, kind, text, CLASSIFIER_CHAR_LIMIT, self.neutral(), |raw| {
            expect_labels(kind, raw)?
                .iter()
                .map(|label| Ok((label.label.to_lowercase(), checked_score(kind, label)?)))
                .collect::<Result<EmotionScores, ModelError>>()
        })
    }
}

#[derive(Debug, Clone)]
pub struct ToxicityAnalyzer {
    registry: Arc<ModelRegistry>,
}

impl ToxicityAnalyzer {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

impl Analyzer for ToxicityAnalyzer {
    type Output = f64;

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Toxicity
    }

    fn neutral(&self) -> f64 {
        0.0
    }

    fn analyze(&self, text: &str) -> Outcome<f64> {
        let kind = self.kind();
        run(&self.registry, kind, text, CLASSIFIER_CHAR_LIMIT, self.neutral(), |raw| {
            let labels = expect_labels(kind, raw)?;
            let overall = labels
                .iter()
                .find(|l| matches!(l.label.to_lowercase().as_str(), "toxicity" | "toxic"))
                .ok_or_else(|| ModelError::malformed(kind, "missing toxicity head"))?;
            checked_score(kind, overall)
        })
    }
}

#[derive(Debug, Clone)]
pub struct EntityAnalyzer {
    registry: Arc<ModelRegistry>,
}

impl EntityAnalyzer {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

impl Analyzer for EntityAnalyzer {
    type Output = Entities;

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Entities
    }

    fn neutral(&self) -> Entities {
        Entities::default()
    }

    fn analyze(&self, text: &str) -> Outcome<Entities> {
        let kind = self.kind();
        run(&self.registry, kind, text, ENTITY_CHAR_LIMIT, self.neutral(), |raw| {
            let RawOutput::Entities(mentions) = raw else {
                return Err(ModelError::malformed(kind, "expected entities, got labels"));
            };
            Ok(group_entities(mentions))
        })
    }
}

fn group_entities(mentions: Vec<RawEntity>) -> Entities {
    let mut entities = Entities::default();
    for mention in mentions {
        let surface = mention.text.trim();
        if surface.is_empty() {
            continue;
        }
        if let Some(bucket) = entities.bucket(&mention.code.to_uppercase()) {
            bucket.insert(surface.to_string());
        }
    }
    entities
}
