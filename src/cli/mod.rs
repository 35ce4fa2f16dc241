//! Command-line interface wiring for signal-enricher.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod enrich;
pub mod serve;
pub mod topics;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "NLP enrichment service for local signals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Enrich(args) => enrich::run(args, settings).await,
            Commands::Topics(args) => topics::run(args).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the enrichment JSON API.
    Serve(serve::Args),
    /// Enrich one signal and print the record as JSON.
    Enrich(enrich::Args),
    /// Assign themes to texts and print the assignments as JSON.
    Topics(topics::Args),
}
