//! Construct-once model registry, one slot per analyzer kind.

use std::{fmt, sync::Arc, time::Instant};

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::{
    error::ModelError,
    nlp::backend::{ModelHandle, ModelProvider},
};

/// The model-backed analyzers known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    Sentiment,
    Emotion,
    Toxicity,
    Entities,
}

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 4] = [
        AnalyzerKind::Sentiment,
        AnalyzerKind::Emotion,
        AnalyzerKind::Toxicity,
        AnalyzerKind::Entities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Emotion => "emotion",
            Self::Toxicity => "toxicity",
            Self::Entities => "entities",
        }
    }

    fn slot(&self) -> usize {
        match self {
            Self::Sentiment => 0,
            Self::Emotion => 1,
            Self::Toxicity => 2,
            Self::Entities => 3,
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds zero or one handle per analyzer kind for the lifetime of the process.
///
/// Concurrent first callers for the same kind block on a single construction
/// and all observe the same handle. A failed construction leaves the slot
/// empty so that the next caller tries again.
pub struct ModelRegistry {
    provider: Arc<dyn ModelProvider>,
    slots: [OnceCell<ModelHandle>; 4],
}

impl ModelRegistry {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            slots: Default::default(),
        }
    }

    pub fn get_or_create(&self, kind: AnalyzerKind) -> Result<ModelHandle, ModelError> {
        self.slots[kind.slot()]
            .get_or_try_init(|| {
                let started = Instant::now();
                info!(%kind, provider = self.provider.name(), "loading model");
                match self.provider.construct(kind) {
                    Ok(handle) => {
                        let elapsed_ms = started.elapsed().as_millis() as u64;
                        info!(%kind, elapsed_ms, "model ready");
                        Ok(handle)
                    }
                    Err(err) => {
                        warn!(%kind, error = %err, "model construction failed");
                        Err(err)
                    }
                }
            })
            .map(Arc::clone)
    }

    pub fn is_loaded(&self, kind: AnalyzerKind) -> bool {
        self.slots[kind.slot()].get().is_some()
    }

    /// Construct every model up front, stopping at the first failure.
    pub fn preload(&self) -> Result<(), ModelError> {
        for kind in AnalyzerKind::ALL {
            self.get_or_create(kind)?;
        }
        Ok(())
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<_> = AnalyzerKind::ALL
            .into_iter()
            .filter(|kind| self.is_loaded(*kind))
            .collect();
        f.debug_struct("ModelRegistry")
            .field("provider", &self.provider.name())
            .field("loaded", &loaded)
            .finish()
    }
}
