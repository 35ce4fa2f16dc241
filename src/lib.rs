//! Enrichment of short local signals with sentiment, emotion, toxicity,
//! entities, keyphrases and topic labels.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod nlp;
