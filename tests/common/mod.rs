#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use signal_enricher::{
    error::ModelError,
    nlp::{
        backend::{InferenceBackend, ModelHandle, ModelProvider, RawEntity, RawLabel, RawOutput},
        enrich::Enricher,
        keyphrase::KeyphraseExtractor,
        registry::{AnalyzerKind, ModelRegistry},
    },
};

type Counter = Arc<Mutex<HashMap<AnalyzerKind, usize>>>;

fn bump(counter: &Counter, kind: AnalyzerKind) {
    *counter.lock().unwrap().entry(kind).or_insert(0) += 1;
}

/// Deterministic stand-in for the inference models, with call accounting.
#[derive(Default)]
pub struct FakeProvider {
    constructions: Counter,
    inferences: Counter,
    inputs: Arc<Mutex<Vec<String>>>,
    failing_construction: HashSet<AnalyzerKind>,
    failing_inference: HashSet<AnalyzerKind>,
    panicking_inference: HashSet<AnalyzerKind>,
    transient_failures: AtomicUsize,
    construct_delay: Duration,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_inference(mut self, kind: AnalyzerKind) -> Self {
        self.failing_inference.insert(kind);
        self
    }

    /// The model for `kind` panics mid-inference instead of returning an error.
    pub fn panicking_inference(mut self, kind: AnalyzerKind) -> Self {
        self.panicking_inference.insert(kind);
        self
    }

    pub fn failing_construction(mut self, kind: AnalyzerKind) -> Self {
        self.failing_construction.insert(kind);
        self
    }

    /// Fail the next `count` constructions, whatever the kind.
    pub fn transient_failures(self, count: usize) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn construct_delay(mut self, delay: Duration) -> Self {
        self.construct_delay = delay;
        self
    }

    pub fn constructions(&self, kind: AnalyzerKind) -> usize {
        self.constructions.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn inferences(&self, kind: AnalyzerKind) -> usize {
        self.inferences.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_inferences(&self) -> usize {
        self.inferences.lock().unwrap().values().sum()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl ModelProvider for FakeProvider {
    fn construct(&self, kind: AnalyzerKind) -> Result<ModelHandle, ModelError> {
        if !self.construct_delay.is_zero() {
            thread::sleep(self.construct_delay);
        }
        bump(&self.constructions, kind);
        let transient = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if transient || self.failing_construction.contains(&kind) {
            return Err(ModelError::construction(kind, "weights not found"));
        }
        Ok(Arc::new(FakeModel {
            kind,
            fail: self.failing_inference.contains(&kind),
            panic: self.panicking_inference.contains(&kind),
            inferences: Arc::clone(&self.inferences),
            inputs: Arc::clone(&self.inputs),
        }))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakeModel {
    kind: AnalyzerKind,
    fail: bool,
    panic: bool,
    inferences: Counter,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl InferenceBackend for FakeModel {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError> {
        bump(&self.inferences, self.kind);
        self.inputs.lock().unwrap().push(text.to_string());
        if self.panic {
            panic!("{} runtime aborted", self.kind);
        }
        if self.fail {
            return Err(ModelError::inference(self.kind, "runtime exploded"));
        }
        // scores depend on what the model actually saw
        let seen = text.chars().count() as f64 / 10_000.0;
        Ok(match self.kind {
            AnalyzerKind::Sentiment => RawOutput::Labels(vec![
                RawLabel::new("NEGATIVE", 0.01235),
                RawLabel::new("POSITIVE", 0.98765 - seen),
            ]),
            AnalyzerKind::Emotion => RawOutput::Labels(vec![
                RawLabel::new("Joy", 0.71234),
                RawLabel::new("Anger", 0.1 + seen),
                RawLabel::new("NEUTRAL", 0.18766),
            ]),
            AnalyzerKind::Toxicity => RawOutput::Labels(vec![
                RawLabel::new("toxicity", 0.04321 + seen),
                RawLabel::new("insult", 0.01),
            ]),
            AnalyzerKind::Entities => RawOutput::Entities(vec![
                entity("Anacostia", "GPE"),
                entity("Anacostia", "LOC"),
                entity("WMATA", "ORG"),
                entity("Muriel Bowser", "PERSON"),
                entity("1200 U St NW", "FAC"),
                entity("Friday", "DATE"),
            ]),
        })
    }
}

fn entity(text: &str, code: &str) -> RawEntity {
    RawEntity {
        text: text.to_string(),
        code: code.to_string(),
    }
}

pub fn registry(provider: &Arc<FakeProvider>) -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::new(provider.clone()))
}

pub fn enricher(provider: &Arc<FakeProvider>) -> Enricher {
    Enricher::new(registry(provider), KeyphraseExtractor::default())
}
