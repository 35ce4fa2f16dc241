//! Error taxonomy shared by the registry, analyzers and service boundary.

use thiserror::Error;

use crate::nlp::registry::AnalyzerKind;

/// Failures raised by inference backends and the model registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The backing model could not be built. Never cached; the next access retries.
    #[error("failed to construct {kind} model: {reason}")]
    Construction { kind: AnalyzerKind, reason: String },

    #[error("{kind} inference failed: {reason}")]
    Inference { kind: AnalyzerKind, reason: String },

    #[error("{kind} model returned malformed output: {reason}")]
    MalformedOutput { kind: AnalyzerKind, reason: String },
}

impl ModelError {
    pub fn kind(&self) -> AnalyzerKind {
        match self {
            Self::Construction { kind, .. }
            | Self::Inference { kind, .. }
            | Self::MalformedOutput { kind, .. } => *kind,
        }
    }

    pub fn construction(kind: AnalyzerKind, reason: impl ToString) -> Self {
        Self::Construction {
            kind,
            reason: reason.to_string(),
        }
    }

    pub fn inference(kind: AnalyzerKind, reason: impl ToString) -> Self {
        Self::Inference {
            kind,
            reason: reason.to_string(),
        }
    }

    pub fn malformed(kind: AnalyzerKind, reason: impl ToString) -> Self {
        Self::MalformedOutput {
            kind,
            reason: reason.to_string(),
        }
    }
}

/// Failures outside analyzer execution; surfaced to the caller as a single error.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("cannot assemble enrichment record: {0}")]
    Assembly(String),
}

/// Failures raised by a topic assignment strategy.
#[derive(Debug, Error)]
pub enum TopicError {
    #[error("topic assignment failed: {0}")]
    Assignment(String),
}
