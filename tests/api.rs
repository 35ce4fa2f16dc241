mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::FakeProvider;
use serde_json::{json, Value};
use signal_enricher::{
    api::{build_router, AppState},
    error::TopicError,
    nlp::{
        registry::AnalyzerKind,
        topics::{KeywordTopicAssigner, TopicAssignment, TopicStrategy},
    },
};
use tower::util::ServiceExt;

fn app_with(topics: impl TopicStrategy + 'static) -> Router {
    app_from(FakeProvider::new(), topics)
}

fn app_from(provider: FakeProvider, topics: impl TopicStrategy + 'static) -> Router {
    let provider = Arc::new(provider);
    build_router(AppState::new(common::enricher(&provider), topics))
}

fn app() -> Router {
    app_with(KeywordTopicAssigner)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

async fn body_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("json body")
}

#[tokio::test]
async fn health_reports_service() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({ "status": "healthy", "service": "ml" })
    );
}

#[tokio::test]
async fn enrich_returns_full_record() {
    let request = post_json(
        "/nlp/enrich",
        json!({ "id": "s-1", "title": "Metro", "text": "Trains delayed again downtown", "metadata": { "source": "rss" } }),
    );
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["id"], "s-1");
    assert_eq!(body["language"], "en");
    assert_eq!(body["sentiment_label"], "positive");
    assert!(body["sentiment_score"].is_number());
    assert!(body["emotion_scores"]["joy"].is_number());
    assert!(body["toxicity_score"].is_number());
    for category in ["places", "organizations", "people", "addresses"] {
        assert!(body["entities"][category].is_array(), "{category} present");
    }
    assert_eq!(body["keyphrases"][0], "metro");
    assert!(body["embedding"].is_null());
}

#[tokio::test]
async fn enrich_is_byte_identical_across_calls() {
    let app = app();
    let payload = json!({ "id": "s-2", "text": "Police report theft near the school" });

    let first = app
        .clone()
        .oneshot(post_json("/nlp/enrich", payload.clone()))
        .await
        .unwrap();
    let second = app
        .oneshot(post_json("/nlp/enrich", payload))
        .await
        .unwrap();
    assert_eq!(
        body_bytes(first.into_body()).await,
        body_bytes(second.into_body()).await
    );
}

#[tokio::test]
async fn crashed_enrichment_is_a_server_error() {
    let provider = FakeProvider::new().panicking_inference(AnalyzerKind::Toxicity);
    let request = post_json("/nlp/enrich", json!({ "id": "s-3", "text": "hello" }));
    let response = app_from(provider, KeywordTopicAssigner)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(message.contains("cannot assemble enrichment record"));
}

#[tokio::test]
async fn blank_id_is_echoed_back() {
    let request = post_json("/nlp/enrich", json!({ "id": "", "text": "hello" }));
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.into_body()).await["id"], "");
}

#[tokio::test]
async fn topic_batch_keys_are_input_ids() {
    let items = json!({ "items": [
        { "id": "b", "text": "The metro bus was delayed" },
        { "id": "a", "text": "Nothing relevant here" },
        { "id": "c", "text": "Shooting near the apartment complex" },
    ]});
    let reversed = json!({ "items": [
        { "id": "c", "text": "Shooting near the apartment complex" },
        { "id": "a", "text": "Nothing relevant here" },
        { "id": "b", "text": "The metro bus was delayed" },
    ]});

    let forward = body_json(
        app()
            .oneshot(post_json("/nlp/topics/batch", items))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let backward = body_json(
        app()
            .oneshot(post_json("/nlp/topics/batch", reversed))
            .await
            .unwrap()
            .into_body(),
    )
    .await;

    let assignments = forward["assignments"].as_object().unwrap();
    assert_eq!(assignments.len(), 3);
    assert_eq!(forward, backward);
    assert_eq!(
        forward["assignments"]["b"],
        json!([{ "themeId": "transit", "name": "Transportation", "weight": 0.8 }])
    );
    assert_eq!(forward["assignments"]["a"][0]["themeId"], "general");
    assert_eq!(forward["assignments"]["c"][0]["themeId"], "safety");
    assert_eq!(forward["assignments"]["c"][1]["themeId"], "housing");
}

#[tokio::test]
async fn duplicate_batch_id_keeps_first_slot_and_last_result() {
    let items = json!({ "items": [
        { "id": "a", "text": "The metro bus was delayed" },
        { "id": "b", "text": "Nothing relevant here" },
        { "id": "a", "text": "Rent is going up again" },
    ]});
    let response = app()
        .oneshot(post_json("/nlp/topics/batch", items))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let raw = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(raw.find("\"a\"").unwrap() < raw.find("\"b\"").unwrap());

    let body: Value = serde_json::from_str(&raw).unwrap();
    let assignments = body["assignments"].as_object().unwrap();
    assert_eq!(assignments.len(), 2);
    assert_eq!(
        body["assignments"]["a"],
        json!([{ "themeId": "housing", "name": "Housing", "weight": 0.8 }])
    );
    assert_eq!(body["assignments"]["b"][0]["themeId"], "general");
}

struct BrokenStrategy;

impl TopicStrategy for BrokenStrategy {
    fn assign(&self, _texts: &[String]) -> Result<Vec<Vec<TopicAssignment>>, TopicError> {
        Err(TopicError::Assignment("model unavailable".into()))
    }
}

#[tokio::test]
async fn topic_strategy_failure_is_a_server_error() {
    let request = post_json(
        "/nlp/topics/batch",
        json!({ "items": [{ "id": "x", "text": "bus" }] }),
    );
    let response = app_with(BrokenStrategy).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(message.contains("model unavailable"));
}
