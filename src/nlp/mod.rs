//! Natural language processing orchestration layer.

pub mod analyzers;
pub mod backend;
pub mod enrich;
pub mod keyphrase;
pub mod lexicon;
pub mod ner;
#[cfg(feature = "onx")]
pub mod onnx;
pub mod registry;
pub mod topics;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{Backend, Settings};

use self::{
    backend::ModelProvider, enrich::Enricher, keyphrase::KeyphraseExtractor,
    lexicon::BuiltinProvider, registry::ModelRegistry,
};

/// Select the model provider configured for this process.
pub fn provider(settings: &Settings) -> Result<Arc<dyn ModelProvider>> {
    match settings.backend {
        Backend::Builtin => Ok(Arc::new(BuiltinProvider)),
        #[cfg(feature = "onx")]
        Backend::Onnx => Ok(Arc::new(onnx::OnnxProvider::new(settings.models_dir.clone()))),
        #[cfg(not(feature = "onx"))]
        Backend::Onnx => anyhow::bail!("MODEL_BACKEND=onnx requires building with the `onx` feature"),
    }
}

/// Build the registry and orchestrator shared by every request.
pub fn build_enricher(settings: &Settings) -> Result<Enricher> {
    let registry = Arc::new(ModelRegistry::new(provider(settings)?));
    info!(
        provider = registry.provider_name(),
        top_n = settings.keyphrase_top_n,
        "enricher configured"
    );
    Ok(Enricher::new(
        registry,
        KeyphraseExtractor::new(settings.keyphrase_top_n),
    ))
}
