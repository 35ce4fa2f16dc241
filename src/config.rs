//! Runtime configuration utilities for signal-enricher.

use std::{env, path::PathBuf, str::FromStr};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::nlp::keyphrase::DEFAULT_TOP_N;

/// Which family of inference models backs the analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Lexicon classifiers and gazetteer recognizer; needs no weights.
    Builtin,
    /// Exported transformer checkpoints under `models_dir` (feature `onx`).
    Onnx,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "onnx" => Ok(Self::Onnx),
            other => bail!("unknown MODEL_BACKEND {other:?}; expected builtin or onnx"),
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Address the HTTP service binds to.
    pub host: String,
    pub port: u16,
    pub backend: Backend,
    /// Root folder holding one sub-directory of weights per analyzer.
    pub models_dir: PathBuf,
    /// Keyphrases returned per signal.
    pub keyphrase_top_n: usize,
    /// Construct every model before accepting requests.
    pub preload_models: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            backend: Backend::Builtin,
            models_dir: PathBuf::from("./models"),
            keyphrase_top_n: DEFAULT_TOP_N,
            preload_models: false,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let host = env::var("ENRICHER_HOST").unwrap_or(defaults.host);
        let port = match env::var("ENRICHER_PORT") {
            Ok(raw) => raw.parse().with_context(|| format!("parsing ENRICHER_PORT={raw}"))?,
            Err(_) => defaults.port,
        };
        let backend = match env::var("MODEL_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.backend,
        };
        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.models_dir);
        let keyphrase_top_n = env::var("KEYPHRASE_TOP_N")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.keyphrase_top_n);
        let preload_models = env::var("PRELOAD_MODELS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.preload_models);

        Ok(Self {
            host,
            port,
            backend,
            models_dir,
            keyphrase_top_n,
            preload_models,
        })
    }
}
