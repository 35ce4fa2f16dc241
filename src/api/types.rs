//! Request and response DTOs; field names follow the service's wire format.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::nlp::{
    analyzers::EmotionScores,
    enrich::{EnrichmentRecord, Signal},
    topics::TopicAssignment,
};

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichRequest {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl From<EnrichRequest> for Signal {
    fn from(value: EnrichRequest) -> Self {
        Signal {
            id: value.id,
            title: value.title,
            body: value.text,
            metadata: value.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitiesDto {
    pub places: BTreeSet<String>,
    pub organizations: BTreeSet<String>,
    pub people: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichResponse {
    pub id: String,
    pub language: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub emotion_scores: EmotionScores,
    pub toxicity_score: f64,
    pub entities: EntitiesDto,
    pub keyphrases: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl From<EnrichmentRecord> for EnrichResponse {
    fn from(value: EnrichmentRecord) -> Self {
        EnrichResponse {
            id: value.id,
            language: value.language,
            sentiment_label: value.sentiment.label.as_str().to_string(),
            sentiment_score: value.sentiment.score,
            emotion_scores: value.emotions,
            toxicity_score: value.toxicity,
            entities: EntitiesDto {
                places: value.entities.places,
                organizations: value.entities.organizations,
                people: value.entities.people,
                addresses: value.entities.addresses,
            },
            keyphrases: value.keyphrases,
            embedding: value.embedding,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicBatchRequest {
    pub items: Vec<TopicItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicBatchResponse {
    pub assignments: IndexMap<String, Vec<TopicAssignment>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub service: String,
}
