use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContestId, Eligibility, OutcomeSnapshot, Submission};
use super::proposition::ContestSchema;
use super::repository::{ContestRepository, RepositoryError};
use super::scoring::{score_submission, ScoringConfig};
use super::service::{ContestService, ContestServiceError};

/// Inline scoring request for callers that keep contest state themselves.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub submission: Submission,
    pub schema: ContestSchema,
    #[serde(default)]
    pub outcomes: OutcomeSnapshot,
    #[serde(default)]
    pub eligibility: Eligibility,
    #[serde(default)]
    pub options: ScoringConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutcomeUpdate {
    pub outcomes: OutcomeSnapshot,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "manual".to_string()
}

/// Router builder exposing stateless scoring and the stored-contest endpoints.
pub fn contest_router<R>(service: Arc<ContestService<R>>) -> Router
where
    R: ContestRepository + 'static,
{
    Router::new()
        .route("/api/v1/score", post(score_handler))
        .route(
            "/api/v1/contests/:contest_id/submissions",
            post(submit_handler::<R>),
        )
        .route(
            "/api/v1/contests/:contest_id/outcomes",
            put(outcomes_handler::<R>),
        )
        .route(
            "/api/v1/contests/:contest_id/leaderboard",
            get(leaderboard_handler::<R>),
        )
        .route(
            "/api/v1/contests/:contest_id/players/:player_name/score",
            get(player_score_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler(axum::Json(request): axum::Json<ScoreRequest>) -> Response {
    let card = score_submission(
        &request.submission,
        &request.schema,
        &request.outcomes,
        &request.eligibility,
        &request.options,
    );
    (StatusCode::OK, axum::Json(card)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(contest_id): Path<String>,
    axum::Json(submission): axum::Json<Submission>,
) -> Response
where
    R: ContestRepository + 'static,
{
    let id = ContestId(contest_id);
    match service.submit(&id, submission) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn outcomes_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(contest_id): Path<String>,
    axum::Json(update): axum::Json<OutcomeUpdate>,
) -> Response
where
    R: ContestRepository + 'static,
{
    let id = ContestId(contest_id);
    match service.record_outcomes(&id, update.outcomes, update.source) {
        Ok(record) => {
            let payload = json!({
                "contest_id": id,
                "updated_at": record.updated_at,
                "source": record.source,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn leaderboard_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path(contest_id): Path<String>,
) -> Response
where
    R: ContestRepository + 'static,
{
    match service.leaderboard(&ContestId(contest_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn player_score_handler<R>(
    State(service): State<Arc<ContestService<R>>>,
    Path((contest_id, player_name)): Path<(String, String)>,
) -> Response
where
    R: ContestRepository + 'static,
{
    match service.score_player(&ContestId(contest_id), &player_name) {
        Ok(card) => (StatusCode::OK, axum::Json(card)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ContestServiceError) -> Response {
    let status = match &error {
        ContestServiceError::ContestNotFound(_) | ContestServiceError::PlayerNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        ContestServiceError::DuplicatePlayer(_)
        | ContestServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ContestServiceError::Locked(_) => StatusCode::LOCKED,
        ContestServiceError::MissingPlayerName => StatusCode::UNPROCESSABLE_ENTITY,
        ContestServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ContestServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
