//! Lexicon-scored classifiers used when no exported weights are configured.
//!
//! The labels mimic what the transformer checkpoints emit (`POSITIVE` /
//! `NEGATIVE`, the seven-way emotion set, detoxify-style toxicity heads) so
//! that the adapters normalize both backends through the same code path.

use std::{cmp::Ordering, collections::HashSet, sync::Arc};

use once_cell::sync::Lazy;

use crate::{
    error::ModelError,
    nlp::{
        backend::{InferenceBackend, ModelHandle, ModelProvider, RawLabel, RawOutput},
        keyphrase::words,
        ner::GazetteerNer,
        registry::AnalyzerKind,
    },
};

static POSITIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "love", "loved", "happy", "wonderful", "amazing",
        "safe", "clean", "beautiful", "improved", "improvement", "thanks", "thank", "helpful",
        "celebrate", "celebration", "fun", "best", "nice", "friendly", "success", "win",
        "opened", "restored", "fixed", "enjoy", "enjoyed", "proud",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "hate", "angry", "delayed", "delay", "broken", "dirty",
        "dangerous", "unsafe", "crime", "shooting", "theft", "stolen", "worst", "closed",
        "eviction", "complaint", "problem", "problems", "fail", "failed", "failure", "sad",
        "scary", "outage", "crash", "violence", "robbery",
    ]
    .into_iter()
    .collect()
});

static EMOTIONS: Lazy<Vec<(&'static str, HashSet<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            "anger",
            ["angry", "furious", "outraged", "hate", "mad", "unacceptable", "ridiculous"]
                .into_iter()
                .collect(),
        ),
        (
            "disgust",
            ["disgusting", "gross", "filthy", "trash", "dirty", "nasty", "rats"]
                .into_iter()
                .collect(),
        ),
        (
            "fear",
            ["afraid", "scared", "scary", "unsafe", "dangerous", "shooting", "threat", "worried"]
                .into_iter()
                .collect(),
        ),
        (
            "joy",
            ["happy", "love", "great", "celebrate", "celebration", "fun", "excited", "wonderful"]
                .into_iter()
                .collect(),
        ),
        (
            "sadness",
            ["sad", "loss", "lost", "miss", "mourning", "closed", "died", "heartbroken"]
                .into_iter()
                .collect(),
        ),
        (
            "surprise",
            ["surprised", "unexpected", "suddenly", "shocked", "wow", "finally"]
                .into_iter()
                .collect(),
        ),
    ]
});

static TOXIC: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "idiot", "idiots", "stupid", "moron", "morons", "dumb", "trash", "scum", "pathetic",
        "loser", "losers", "shut", "disgusting", "hate",
    ]
    .into_iter()
    .collect()
});

static THREATS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["kill", "hurt", "destroy", "beat"].into_iter().collect());

fn lowered_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    words(&lower).map(str::to_string).collect()
}

struct LexiconSentiment;

impl InferenceBackend for LexiconSentiment {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError> {
        let tokens = lowered_words(text);
        let pos = tokens.iter().filter(|t| POSITIVE.contains(t.as_str())).count();
        let neg = tokens.iter().filter(|t| NEGATIVE.contains(t.as_str())).count();
        let label = match pos.cmp(&neg) {
            Ordering::Greater => "POSITIVE",
            Ordering::Less => "NEGATIVE",
            Ordering::Equal => {
                return Ok(RawOutput::Labels(vec![RawLabel::new("NEUTRAL", 0.5)]));
            }
        };
        let margin = pos.abs_diff(neg) as f64;
        let confidence = 0.5 + 0.5 * margin / (pos + neg + 1) as f64;
        Ok(RawOutput::Labels(vec![RawLabel::new(label, confidence)]))
    }
}

struct LexiconEmotion;

impl InferenceBackend for LexiconEmotion {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError> {
        let tokens = lowered_words(text);
        let mut weights: Vec<(&str, f64)> = EMOTIONS
            .iter()
            .map(|(name, cues)| {
                let hits = tokens.iter().filter(|t| cues.contains(t.as_str())).count();
                (*name, hits as f64 + 0.05)
            })
            .collect();
        weights.push(("neutral", 1.0));
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let labels = weights
            .into_iter()
            .map(|(name, weight)| RawLabel::new(name, weight / total))
            .collect();
        Ok(RawOutput::Labels(labels))
    }
}

struct LexiconToxicity;

impl InferenceBackend for LexiconToxicity {
    fn infer(&self, text: &str) -> Result<RawOutput, ModelError> {
        let tokens = lowered_words(text);
        let insults = tokens.iter().filter(|t| TOXIC.contains(t.as_str())).count();
        let threats = tokens.iter().filter(|t| THREATS.contains(t.as_str())).count();
        let saturate = |hits: usize| 1.0 - 0.5f64.powi(hits.min(32) as i32);
        Ok(RawOutput::Labels(vec![
            RawLabel::new("toxicity", saturate(insults + threats)),
            RawLabel::new("insult", saturate(insults)),
            RawLabel::new("threat", saturate(threats)),
        ]))
    }
}

/// Provider for the lexicon classifiers and the gazetteer recognizer.
#[derive(Debug, Default)]
pub struct BuiltinProvider;

impl ModelProvider for BuiltinProvider {
    fn construct(&self, kind: AnalyzerKind) -> Result<ModelHandle, ModelError> {
        let handle: ModelHandle = match kind {
            AnalyzerKind::Sentiment => Arc::new(LexiconSentiment),
            AnalyzerKind::Emotion => Arc::new(LexiconEmotion),
            AnalyzerKind::Toxicity => Arc::new(LexiconToxicity),
            AnalyzerKind::Entities => Arc::new(GazetteerNer::new()),
        };
        Ok(handle)
    }

    fn name(&self) -> &str {
        "builtin"
    }
}
