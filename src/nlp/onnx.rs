#![cfg(feature = "onx")]

//! Transformer sequence classifiers exported to ONNX, run through onnxruntime.
//!
//! Expected layout per analyzer kind:
//! `MODELS_DIR/<kind>/model.onnx`, `tokenizer.json` and the Hugging Face
//! `config.json` carrying `id2label`.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};

use crate::{
    error::ModelError,
    nlp::{
        backend::{InferenceBackend, ModelHandle, ModelProvider, RawLabel, RawOutput},
        ner::GazetteerNer,
        registry::AnalyzerKind,
    },
};

#[derive(Debug, Clone, Copy)]
enum Activation {
    /// Single-label heads (sentiment, emotion).
    Softmax,
    /// Independent multi-label heads (toxicity).
    Sigmoid,
}

/// Position embeddings of the BERT-family checkpoints this backend targets.
const MAX_TOKENS: usize = 512;

#[derive(Debug, Deserialize)]
struct HfConfig {
    id2label: HashMap<String, String>,
    #[serde(default)]
    max_position_embeddings: Option<usize>,
}

impl HfConfig {
    /// Longest encoding the model accepts. RoBERTa-style configs reserve two
    /// positions for padding offsets, so never exceed `MAX_TOKENS`.
    fn token_limit(&self) -> usize {
        self.max_position_embeddings.map_or(MAX_TOKENS, |n| n.min(MAX_TOKENS))
    }
}

struct OnnxClassifier {
    kind: AnalyzerKind,
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    input_names: Vec<String>,
    output_name: String,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    activation: Activation,
}

impl OnnxClassifier {
    fn load(kind: AnalyzerKind, dir: &Path, activation: Activation) -> Result<Self, ModelError> {
        let fail = |reason: String| ModelError::construction(kind, reason);
        let config = std::fs::read_to_string(dir.join("config.json"))
            .map_err(|e| fail(format!("config.json: {e}")))?;
        let config: HfConfig =
            serde_json::from_str(&config).map_err(|e| fail(format!("config.json: {e}")))?;
        let mut tokenizer = Tokenizer::from_file(dir.join("tokenizer.json"))
            .map_err(|e| fail(format!("tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.token_limit(),
                ..TruncationParams::default()
            }))
            .map_err(|e| fail(format!("truncation: {e}")))?;
        let labels = ordered_labels(config.id2label).map_err(fail)?;
        let session = Session::builder()
            .map_err(|e| fail(format!("session: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(|e| fail(format!("session: {e}")))?
            .commit_from_file(dir.join("model.onnx"))
            .map_err(|e| fail(format!("session: {e}")))?;
        let input_names = session.inputs.iter().map(|input| input.name.clone()).collect();
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| fail("model declares no outputs".to_string()))?;
        Ok(Self {
            kind,
            session: Mutex::new(session),
            input_names,
            output_name,
            tokenizer,
            labels,
            activation,
        })
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let fail = |reason: String| ModelError::inference(self.kind, reason);
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| fail(format!("tokenize: {e}")))?;
        let len = encoding.get_ids().len();
        let to_tensor = |values: &[u32]| -> Result<Tensor<i64>, ModelError> {
            let values: Vec<i64> = values.iter().map(|v| i64::from(*v)).collect();
            Tensor::from_array(([1usize, len], values))
                .map_err(|e| fail(format!("input tensor: {e}")))
        };

        let mut inputs = Vec::with_capacity(self.input_names.len());
        for name in &self.input_names {
            let tensor = match name.as_str() {
                "input_ids" => to_tensor(encoding.get_ids())?,
                "attention_mask" => to_tensor(encoding.get_attention_mask())?,
                "token_type_ids" => to_tensor(encoding.get_type_ids())?,
                other => return Err(fail(format!("unsupported model input {other}"))),
            };
            inputs.push((name.as_str(), tensor));
        }
        let mut session = self
            .session
            .lock()
            .map_err(|_| fail("session lock poisoned".to_string()))?;
        let outputs = session.run(inputs).map_err(|e| fail(format!("run: {e}")))?;
        let first = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| ModelError::malformed(self.kind, "no outputs"))?;
        let (_, logits) = first
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::malformed(self.kind, format!("logits: {e}")))?;
        Ok(logits.to_vec())
    }
}

impl InferenceBackend for OnnxClassifier {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError> {
        let logits = self.logits(text)?;
        if logits.len() != self.labels.len() {
            return Err(ModelError::malformed(
                self.kind,
                format!("{} logits for {} labels", logits.len(), self.labels.len()),
            ));
        }
        let scores = match self.activation {
            Activation::Softmax => softmax(&logits),
            Activation::Sigmoid => logits.iter().map(|x| 1.0 / (1.0 + (-x).exp())).collect(),
        };
        Ok(RawOutput::Labels(
            self.labels
                .iter()
                .zip(scores)
                .map(|(label, score)| RawLabel::new(label.clone(), f64::from(score)))
                .collect(),
        ))
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn ordered_labels(id2label: HashMap<String, String>) -> Result<Vec<String>, String> {
    let mut indexed = id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|idx| (idx, label))
                .map_err(|_| format!("non-numeric label id {id}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    indexed.sort_by_key(|(idx, _)| *idx);
    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

/// Loads exported checkpoints from a models directory.
pub struct OnnxProvider {
    models_dir: PathBuf,
}

impl OnnxProvider {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }
}

impl ModelProvider for OnnxProvider {
    fn construct(&self, kind: AnalyzerKind) -> Result<ModelHandle, ModelError> {
        let activation = match kind {
            AnalyzerKind::Sentiment | AnalyzerKind::Emotion => Activation::Softmax,
            AnalyzerKind::Toxicity => Activation::Sigmoid,
            // token classification is not exported; keep the gazetteer
            AnalyzerKind::Entities => return Ok(Arc::new(GazetteerNer::new())),
        };
        let dir = self.models_dir.join(kind.as_str());
        let classifier = OnnxClassifier::load(kind, &dir, activation)?;
        Ok(Arc::new(classifier))
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
