//! Per-signal enrichment: run every analyzer, settle failures, assemble the record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    error::EnrichError,
    nlp::{
        analyzers::{
            Analyzer, EmotionAnalyzer, EmotionScores, Entities, EntityAnalyzer, Outcome,
            Sentiment, SentimentAnalyzer, ToxicityAnalyzer,
        },
        keyphrase::KeyphraseExtractor,
        registry::ModelRegistry,
    },
};

/// Language tag attached to every record; detection is not performed.
pub const DEFAULT_LANGUAGE: &str = "en";

/// One unit of input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Signal {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: body.into(),
            metadata: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// `title + " " + body`, trimmed; a missing title contributes nothing.
    pub fn combined_text(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} {}", self.body).trim().to_string(),
            None => self.body.trim().to_string(),
        }
    }
}

/// Fully shaped enrichment result; degraded analyzers hold their neutral default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentRecord {
    pub id: String,
    pub language: String,
    pub sentiment: Sentiment,
    pub emotions: EmotionScores,
    pub toxicity: f64,
    pub entities: Entities,
    pub keyphrases: Vec<String>,
    /// Embeddings are not generated yet; always `None`.
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct Enricher {
    registry: Arc<ModelRegistry>,
    sentiment: SentimentAnalyzer,
    emotion: EmotionAnalyzer,
    toxicity: ToxicityAnalyzer,
    entities: EntityAnalyzer,
    keyphrases: KeyphraseExtractor,
}

impl Enricher {
    pub fn new(registry: Arc<ModelRegistry>, keyphrases: KeyphraseExtractor) -> Self {
        Self {
            sentiment: SentimentAnalyzer::new(Arc::clone(&registry)),
            emotion: EmotionAnalyzer::new(Arc::clone(&registry)),
            toxicity: ToxicityAnalyzer::new(Arc::clone(&registry)),
            entities: EntityAnalyzer::new(Arc::clone(&registry)),
            registry,
            keyphrases,
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    #[instrument(skip_all, fields(signal_id = %signal.id))]
    pub fn enrich(&self, signal: &Signal) -> Result<EnrichmentRecord, EnrichError> {
        let text = signal.combined_text();

        let ((sentiment, emotions), (toxicity, entities)) = rayon::join(
            || {
                rayon::join(
                    || settle(&signal.id, &self.sentiment, &text),
                    || settle(&signal.id, &self.emotion, &text),
                )
            },
            || {
                rayon::join(
                    || settle(&signal.id, &self.toxicity, &text),
                    || settle(&signal.id, &self.entities, &text),
                )
            },
        );
        let keyphrases = self.keyphrases.extract(&text);

        debug!(
            sentiment = sentiment.label.as_str(),
            toxicity,
            keyphrases = keyphrases.len(),
            "signal enriched"
        );
        Ok(EnrichmentRecord {
            id: signal.id.clone(),
            language: DEFAULT_LANGUAGE.to_string(),
            sentiment,
            emotions,
            toxicity,
            entities,
            keyphrases,
            embedding: None,
        })
    }
}

/// Run one analyzer and map a failed outcome to its neutral default.
fn settle<A: Analyzer>(signal_id: &str, analyzer: &A, text: &str) -> A::Output {
    match analyzer.analyze(text) {
        Outcome::Success(value) => value,
        Outcome::Failed(err) => {
            warn!(signal_id, kind = %analyzer.kind(), error = %err, "analyzer failed; using neutral default");
            analyzer.neutral()
        }
    }
}
