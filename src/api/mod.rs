//! HTTP layer exposing signal enrichment and topic assignment.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::nlp::{enrich::Enricher, topics::TopicStrategy};

#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<Enricher>,
    pub topics: Arc<dyn TopicStrategy>,
}

impl AppState {
    pub fn new(enricher: Enricher, topics: impl TopicStrategy + 'static) -> Self {
        Self {
            enricher: Arc::new(enricher),
            topics: Arc::new(topics),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/nlp/enrich", post(routes::enrich_signal))
        .route("/nlp/topics/batch", post(routes::assign_topics_batch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let router = build_router(state);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving signal-enricher API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
