//! CLI entry-point for rule-based topic assignment.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::nlp::topics::{KeywordTopicAssigner, TopicStrategy};

/// Args for the `topics` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Texts to label, one theme list is printed per text.
    #[arg(required = true)]
    pub texts: Vec<String>,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let assignments = KeywordTopicAssigner.assign(&args.texts)?;
    println!("{}", serde_json::to_string_pretty(&assignments)?);
    Ok(())
}
