//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use pitchboard_test_support::{FixedClock, InMemoryScoreRepository};
use tower::ServiceExt;

use pitchboard_api::routes;
use pitchboard_api::state::AppState;

/// Build the full app router over an in-memory score store and a fixed
/// clock. Uses the same route structure as `main.rs`. The returned state
/// shares the router's registry so tests can attach live connections.
pub fn build_test_app() -> (Router, AppState) {
    let clock = Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 3, 12, 14, 0, 0).unwrap(),
    ));
    let app_state = AppState::new(Arc::new(InMemoryScoreRepository::new()), clock);

    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::ws::router())
        .nest("/api/v1/scores", routes::scores::router())
        .with_state(app_state.clone());

    (router, app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, Some(body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "PUT", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", uri, None).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "DELETE", uri, None).await
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// A full, valid submission body for one (startup, judge, round) key.
pub fn submit_body(
    startup_id: uuid::Uuid,
    judge_id: uuid::Uuid,
    round_id: uuid::Uuid,
    fill: u8,
) -> serde_json::Value {
    serde_json::json!({
        "startupId": startup_id,
        "judgeId": judge_id,
        "roundId": round_id,
        "scores": {
            "problem": fill, "solution": fill, "innovation": fill,
            "team": fill, "businessModel": fill, "marketOpportunity": fill,
            "technicalFeasibility": fill, "executionStrategy": fill,
            "pitchQuality": fill,
        },
        "nominated": false,
    })
}
