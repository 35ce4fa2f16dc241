//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use indexmap::IndexMap;
use tracing::{error, info};

use crate::{
    api::types::{EnrichRequest, EnrichResponse, HealthDto, TopicBatchRequest, TopicBatchResponse},
    error::EnrichError,
    nlp::enrich::Signal,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn internal(message: String) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy".to_string(),
        service: "ml".to_string(),
    })
}

pub async fn enrich_signal(
    State(state): State<AppState>,
    Json(request): Json<EnrichRequest>,
) -> ApiResult<EnrichResponse> {
    let signal = Signal::from(request);
    let signal_id = signal.id.clone();
    let enricher = state.enricher.clone();
    // inference is CPU bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || enricher.enrich(&signal))
        .await
        .map_err(|e| EnrichError::Assembly(e.to_string()))
        .and_then(|result| result)
        .map_err(|e| e.to_string());
    match outcome {
        Ok(record) => Ok(Json(record.into())),
        Err(message) => {
            error!(%signal_id, %message, "error enriching signal");
            Err(internal(message))
        }
    }
}

pub async fn assign_topics_batch(
    State(state): State<AppState>,
    Json(request): Json<TopicBatchRequest>,
) -> ApiResult<TopicBatchResponse> {
    let texts: Vec<String> = request.items.iter().map(|item| item.text.clone()).collect();
    let topics = state.topics.clone();
    let assigned = tokio::task::spawn_blocking(move || topics.assign(&texts))
        .await
        .map_err(|e| internal(e.to_string()))?
        .map_err(|e| {
            error!(error = %e, "error assigning topics");
            internal(e.to_string())
        })?;
    if assigned.len() != request.items.len() {
        let message = format!(
            "topic strategy returned {} assignments for {} items",
            assigned.len(),
            request.items.len()
        );
        error!(%message, "error assigning topics");
        return Err(internal(message));
    }

    let mut assignments = IndexMap::with_capacity(request.items.len());
    for (item, themes) in request.items.into_iter().zip(assigned) {
        assignments.insert(item.id, themes);
    }
    info!(items = assignments.len(), "assigned topics");
    Ok(Json(TopicBatchResponse { assignments }))
}
