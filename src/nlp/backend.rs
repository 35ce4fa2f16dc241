//! Inference backend contracts consumed by the model registry.

use std::sync::Arc;

use crate::{error::ModelError, nlp::registry::AnalyzerKind};

/// One native label emitted by a sequence classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLabel {
    pub label: String,
    pub score: f64,
}

impl RawLabel {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// One entity mention with the recognizer's native type code.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity {
    pub text: String,
    pub code: String,
}

/// Unnormalized model output, as produced by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Labels(Vec<RawLabel>),
    Entities(Vec<RawEntity>),
}

/// A constructed model. Implementations must be reusable across concurrent requests.
pub trait InferenceBackend: Send + Sync {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError>;
}

/// Shared, process-lifetime handle to a constructed model.
pub type ModelHandle = Arc<dyn InferenceBackend>;

/// Builds model handles on demand. Construction may be slow (weights load).
pub trait ModelProvider: Send + Sync {
    fn construct(&self, kind: AnalyzerKind) -> Result<ModelHandle, ModelError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
