//! Routes for the scoring context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post, routing::put};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use pitchboard_core::record::{ScoreCorrection, ScoreRecord, ScoreValues};
use pitchboard_scoring::application::command_handlers;
use pitchboard_scoring::application::query_handlers::{self, AggregateSummary};
use pitchboard_scoring::domain::commands::{CorrectScore, DeleteScore, SubmitScore};
use pitchboard_scoring::domain::weights::WeightSet;

use crate::error::ApiError;
use crate::live;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    /// The startup being scored.
    pub startup_id: Uuid,
    /// The submitting judge.
    pub judge_id: Uuid,
    /// The round of the evaluation.
    pub round_id: Uuid,
    /// The nine sub-scores, each in [1, 5].
    pub scores: ScoreValues,
    /// Optional free-text feedback.
    pub feedback: Option<String>,
    /// Whether the judge nominates this startup.
    #[serde(default)]
    pub nominated: bool,
    /// Optional nomination rationale.
    pub nomination_reason: Option<String>,
}

/// Request body for POST /aggregate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    /// The startup to summarize.
    pub startup_id: Uuid,
    /// The round to summarize.
    pub round_id: Uuid,
    /// Optional criteria weights for the composite score.
    pub weights: Option<WeightSet>,
}

/// Response body for mutations that return the affected record.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    /// Human-readable outcome.
    pub message: &'static str,
    /// The created or updated record.
    pub score: ScoreRecord,
}

/// Response body for score listings.
#[derive(Debug, Serialize)]
pub struct ScoreListResponse {
    /// Matching records, ordered by creation time. Empty when none exist.
    pub scores: Vec<ScoreRecord>,
}

/// Response body for the aggregate query.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AggregateResponse {
    /// The computed summary, rounded for presentation.
    Summary(AggregateSummary),
    /// Explicit no-data marker for a group nobody has scored.
    #[serde(rename_all = "camelCase")]
    NoData {
        /// Always `true`.
        no_data: bool,
    },
}

/// POST /
#[instrument(skip(state, request), fields(startup_id = %request.startup_id, round_id = %request.round_id))]
async fn submit_score(
    State(state): State<AppState>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<(StatusCode, Json<ScoreResponse>), ApiError> {
    let command = SubmitScore {
        correlation_id: Uuid::new_v4(),
        startup_id: request.startup_id,
        judge_id: request.judge_id,
        round_id: request.round_id,
        scores: request.scores,
        feedback: request.feedback,
        nominated: request.nominated,
        nomination_reason: request.nomination_reason,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_score command");

    let (record, change) = command_handlers::handle_submit_score(
        &command,
        state.clock.as_ref(),
        state.repository.as_ref(),
    )
    .await?;

    // Broadcast happens off the request path; the submission is already
    // durable when the caller sees 201.
    live::spawn_publish(state, change);

    Ok((
        StatusCode::CREATED,
        Json(ScoreResponse {
            message: "Score submitted successfully",
            score: record,
        }),
    ))
}

/// GET /startup/{id}
#[instrument(skip(state))]
async fn scores_by_startup(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> Result<Json<ScoreListResponse>, ApiError> {
    let scores =
        query_handlers::list_scores_for_startup(startup_id, state.repository.as_ref()).await?;
    Ok(Json(ScoreListResponse { scores }))
}

/// GET /round/{id}
#[instrument(skip(state))]
async fn scores_by_round(
    State(state): State<AppState>,
    Path(round_id): Path<Uuid>,
) -> Result<Json<ScoreListResponse>, ApiError> {
    let scores =
        query_handlers::list_scores_for_round(round_id, state.repository.as_ref()).await?;
    Ok(Json(ScoreListResponse { scores }))
}

/// PUT /{id}
#[instrument(skip(state, correction))]
async fn correct_score(
    State(state): State<AppState>,
    Path(score_id): Path<Uuid>,
    Json(correction): Json<ScoreCorrection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let command = CorrectScore {
        correlation_id: Uuid::new_v4(),
        score_id,
        correction,
    };

    info!(correlation_id = %command.correlation_id, "handling correct_score command");

    let (record, change) =
        command_handlers::handle_correct_score(&command, state.repository.as_ref()).await?;

    live::spawn_publish(state, change);

    Ok(Json(ScoreResponse {
        message: "Score updated successfully",
        score: record,
    }))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_score(
    State(state): State<AppState>,
    Path(score_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let command = DeleteScore {
        correlation_id: Uuid::new_v4(),
        score_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_score command");

    let (record, change) =
        command_handlers::handle_delete_score(&command, state.repository.as_ref()).await?;

    live::spawn_publish(state, change);

    Ok(Json(ScoreResponse {
        message: "Score deleted successfully",
        score: record,
    }))
}

/// POST /aggregate
#[instrument(skip(state, request), fields(startup_id = %request.startup_id, round_id = %request.round_id))]
async fn aggregate(
    State(state): State<AppState>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let summary = query_handlers::get_group_aggregate(
        request.startup_id,
        request.round_id,
        request.weights.as_ref(),
        state.repository.as_ref(),
    )
    .await?;

    Ok(Json(match summary {
        // Two-decimal rounding happens here, at the presentation boundary.
        Some(summary) => AggregateResponse::Summary(summary.rounded()),
        None => AggregateResponse::NoData { no_data: true },
    }))
}

/// Returns the router for the scoring context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_score))
        .route("/aggregate", post(aggregate))
        .route("/startup/{id}", get(scores_by_startup))
        .route("/round/{id}", get(scores_by_round))
        .route("/{id}", put(correct_score).delete(delete_score))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use pitchboard_test_support::{FailingScoreRepository, FixedClock, InMemoryScoreRepository};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn test_app_state() -> AppState {
        AppState::new(
            Arc::new(InMemoryScoreRepository::new()),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 3, 12, 14, 0, 0).unwrap(),
            )),
        )
    }

    fn failing_app_state() -> AppState {
        AppState::new(
            Arc::new(FailingScoreRepository),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 3, 12, 14, 0, 0).unwrap(),
            )),
        )
    }

    fn scores_json(fill: u8) -> Value {
        json!({
            "problem": fill, "solution": fill, "innovation": fill,
            "team": fill, "businessModel": fill, "marketOpportunity": fill,
            "technicalFeasibility": fill, "executionStrategy": fill,
            "pitchQuality": fill,
        })
    }

    fn submit_body(startup_id: Uuid, judge_id: Uuid, round_id: Uuid, fill: u8) -> Value {
        json!({
            "startupId": startup_id,
            "judgeId": judge_id,
            "roundId": round_id,
            "scores": scores_json(fill),
            "feedback": "clear problem statement",
            "nominated": true,
            "nominationReason": "audience favorite",
        })
    }

    async fn request(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
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
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_submit_returns_201_with_created_record() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = submit_body(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 4);

        // Act
        let (status, json) = request(app, "POST", "/", Some(&body)).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "Score submitted successfully");
        Uuid::parse_str(json["score"]["id"].as_str().unwrap()).unwrap();
        assert_eq!(json["score"]["scores"]["problem"], 4);
        assert_eq!(json["score"]["nominated"], true);
    }

    #[tokio::test]
    async fn test_duplicate_submit_returns_409() {
        // Arrange
        let state = test_app_state();
        let body = submit_body(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 4);
        let (status, _) = request(router().with_state(state.clone()), "POST", "/", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);

        // Act
        let (status, json) = request(router().with_state(state), "POST", "/", Some(&body)).await;

        // Assert
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "duplicate_submission");
        assert_eq!(json["retryable"], false);
    }

    #[tokio::test]
    async fn test_out_of_range_sub_score_returns_400() {
        // Arrange — a zero sub-score is outside [1, 5].
        let app = router().with_state(test_app_state());
        let mut body = submit_body(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 4);
        body["scores"]["team"] = json!(0);

        // Act
        let (status, json) = request(app, "POST", "/", Some(&body)).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_listing_unknown_startup_returns_empty_list() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let uri = format!("/startup/{}", Uuid::new_v4());
        let (status, json) = request(app, "GET", &uri, None).await;

        // Assert — empty sequence, not an error, at this boundary.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["scores"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_round_listing_returns_submissions_in_creation_order() {
        // Arrange
        let state = test_app_state();
        let round_id = Uuid::new_v4();
        for _ in 0..2 {
            let body = submit_body(Uuid::new_v4(), Uuid::new_v4(), round_id, 3);
            let (status, _) =
                request(router().with_state(state.clone()), "POST", "/", Some(&body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        // Act
        let uri = format!("/round/{round_id}");
        let (status, json) = request(router().with_state(state), "GET", &uri, None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["scores"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_correct_unknown_record_returns_404() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = json!({ "nominated": false });

        // Act
        let uri = format!("/{}", Uuid::now_v7());
        let (status, json) = request(app, "PUT", &uri, Some(&body)).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_correct_replaces_mutable_fields() {
        // Arrange
        let state = test_app_state();
        let body = submit_body(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 4);
        let (_, created) =
            request(router().with_state(state.clone()), "POST", "/", Some(&body)).await;
        let id = created["score"]["id"].as_str().unwrap().to_owned();

        // Act
        let correction = json!({ "scores": scores_json(2), "nominated": false });
        let (status, json) = request(
            router().with_state(state),
            "PUT",
            &format!("/{id}"),
            Some(&correction),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["score"]["scores"]["problem"], 2);
        assert_eq!(json["score"]["nominated"], false);
        assert_eq!(json["score"]["feedback"], "clear problem statement");
    }

    #[tokio::test]
    async fn test_delete_then_aggregate_reports_no_data() {
        // Arrange
        let state = test_app_state();
        let startup_id = Uuid::new_v4();
        let round_id = Uuid::new_v4();
        let body = submit_body(startup_id, Uuid::new_v4(), round_id, 4);
        let (_, created) =
            request(router().with_state(state.clone()), "POST", "/", Some(&body)).await;
        let id = created["score"]["id"].as_str().unwrap().to_owned();

        let (status, _) = request(
            router().with_state(state.clone()),
            "DELETE",
            &format!("/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Act
        let query = json!({ "startupId": startup_id, "roundId": round_id });
        let (status, json) = request(
            router().with_state(state),
            "POST",
            "/aggregate",
            Some(&query),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["noData"], true);
    }

    #[tokio::test]
    async fn test_aggregate_of_two_judges_is_their_mean() {
        // Arrange — judges A and B score the same (startup, round).
        let state = test_app_state();
        let startup_id = Uuid::new_v4();
        let round_id = Uuid::new_v4();
        for fill in [3, 5] {
            let body = submit_body(startup_id, Uuid::new_v4(), round_id, fill);
            let (status, _) =
                request(router().with_state(state.clone()), "POST", "/", Some(&body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        // Act — weight 50 on "problem" only.
        let query = json!({
            "startupId": startup_id,
            "roundId": round_id,
            "weights": [{ "criteriaKey": "problem", "weight": 50.0 }],
        });
        let (status, json) = request(
            router().with_state(state),
            "POST",
            "/aggregate",
            Some(&query),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["judgeCount"], 2);
        assert_eq!(json["totalNominations"], 2);
        assert!((json["averageScores"]["problem"].as_f64().unwrap() - 4.0).abs() < 1e-9);
        assert!((json["composite"].as_f64().unwrap() - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_store_outage_returns_503_retryable() {
        // Arrange
        let app = router().with_state(failing_app_state());
        let body = submit_body(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 4);

        // Act
        let (status, json) = request(app, "POST", "/", Some(&body)).await;

        // Assert
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "store_unavailable");
        assert_eq!(json["retryable"], true);
    }
}
