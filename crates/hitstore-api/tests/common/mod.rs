//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hitstore_core::clock::Clock;
use hitstore_core::repository::HitEventStore;
use hitstore_core::validation::ConstraintValidator;
use hitstore_pg::pg_hit_event_store::PgHitEventStore;
use hitstore_test_support::{FixedClock, InMemoryHitEventStore};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use hitstore_api::routes;
use hitstore_api::state::AppState;

/// "Today" for every integration test is 2024-01-20.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::at(2024, 1, 20, 10, 0, 0))
}

/// Build the full app router over `store`, using the same route structure
/// as `main.rs`.
pub fn build_test_app(store: Arc<dyn HitEventStore>) -> Router {
    let app_state = AppState::new(fixed_clock(), Arc::new(ConstraintValidator), store);
    routes::app(app_state)
}

/// Build the app over a fresh in-memory store and return both, so tests can
/// reuse the store across requests.
pub fn build_in_memory_app() -> (Router, Arc<InMemoryHitEventStore>) {
    let store = Arc::new(InMemoryHitEventStore::new());
    (build_test_app(store.clone()), store)
}

/// Build the app over a real `PgHitEventStore`.
pub fn build_pg_app(pool: PgPool) -> Router {
    build_test_app(Arc::new(PgHitEventStore::new(pool)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response. The body is `Null` when
/// the response has none.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Record one hit event through the API and assert it was created.
pub async fn record(app: Router, rule_name: &str, timestamp: &str, hits: i64) -> serde_json::Value {
    let (status, json) = post_json(
        app,
        "/api/v1/hits",
        &serde_json::json!({
            "rule_name": rule_name,
            "timestamp": timestamp,
            "number_of_hits": hits
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
    json
}
