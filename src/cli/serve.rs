//! CLI entry-point for serving the HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    api::{self, AppState},
    config::Settings,
    nlp::{self, topics::KeywordTopicAssigner},
};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind; overrides ENRICHER_PORT.
    #[arg(long)]
    pub port: Option<u16>,
    /// Host address; overrides ENRICHER_HOST.
    #[arg(long)]
    pub host: Option<String>,
    /// Construct every model before accepting requests.
    #[arg(long)]
    pub preload: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let enricher = nlp::build_enricher(&settings)?;
    if args.preload || settings.preload_models {
        let registry = enricher.registry().clone();
        tokio::task::spawn_blocking(move || registry.preload()).await??;
        info!("all models preloaded");
    }
    let host = args.host.unwrap_or(settings.host);
    let port = args.port.unwrap_or(settings.port);
    let state = AppState::new(enricher, KeywordTopicAssigner);
    api::serve(state, &host, port).await
}
