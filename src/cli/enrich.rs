//! CLI entry-point for enriching a single signal.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::types::EnrichResponse,
    config::Settings,
    nlp::{self, enrich::Signal},
};

/// Args for the `enrich` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Signal identifier echoed in the record.
    #[arg(long, default_value = "cli")]
    pub id: String,
    /// Body text.
    #[arg(long)]
    pub text: String,
    /// Optional title prepended to the body.
    #[arg(long)]
    pub title: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let enricher = nlp::build_enricher(&settings)?;
    let mut signal = Signal::new(args.id, args.text);
    signal.title = args.title;
    let record = tokio::task::spawn_blocking(move || enricher.enrich(&signal)).await??;
    println!("{}", serde_json::to_string_pretty(&EnrichResponse::from(record))?);
    Ok(())
}
