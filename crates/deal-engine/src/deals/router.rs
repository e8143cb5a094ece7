use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::batch::decode_submission;
use super::domain::{CounterpartyId, ProjectId};
use super::intake::ProjectSubmission;
use super::provider::{DealDataProvider, MatchNotifier, ProviderError};
use super::service::{DealService, DealServiceError};

/// Body accepted by the scoring endpoint: one project or a batch.
///
/// Batch members stay raw JSON until scoring so a malformed member fails alone.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScoringRequest {
    Batch { projects: Vec<Value> },
    Single { project: ProjectSubmission },
}

/// Body accepted by the matching endpoint. Exactly one side is expected; the project wins if
/// both are present.
#[derive(Debug, Default, Deserialize)]
pub struct MatchingRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub counterparty_id: Option<String>,
    /// Overrides the configured minimum match score for this request.
    #[serde(default)]
    pub min_score: Option<u32>,
}

/// Router exposing scoring and matching over HTTP.
pub fn deal_router<P, N>(service: Arc<DealService<P, N>>) -> Router
where
    P: DealDataProvider + 'static,
    N: MatchNotifier + 'static,
{
    Router::new()
        .route("/api/v1/scoring", post(scoring_handler::<P, N>))
        .route(
            "/api/v1/projects/:project_id/score",
            get(project_score_handler::<P, N>),
        )
        .route("/api/v1/matching", post(matching_handler::<P, N>))
        .with_state(service)
}

pub(crate) async fn scoring_handler<P, N>(
    State(service): State<Arc<DealService<P, N>>>,
    axum::Json(request): axum::Json<ScoringRequest>,
) -> Response
where
    P: DealDataProvider + 'static,
    N: MatchNotifier + 'static,
{
    match request {
        ScoringRequest::Batch { projects } => {
            let report = service.score_entries(projects.into_iter().map(decode_submission));
            (StatusCode::OK, axum::Json(report.into_view())).into_response()
        }
        ScoringRequest::Single { project } => match service.score_submission(project) {
            Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
            Err(DealServiceError::Intake(violation)) => {
                let payload = json!({
                    "error": violation.to_string(),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
            }
            Err(other) => internal_error(other),
        },
    }
}

pub(crate) async fn project_score_handler<P, N>(
    State(service): State<Arc<DealService<P, N>>>,
    Path(project_id): Path<String>,
) -> Response
where
    P: DealDataProvider + 'static,
    N: MatchNotifier + 'static,
{
    let id = ProjectId(project_id);
    match service.score_project(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(DealServiceError::Provider(ProviderError::NotFound)) => {
            let payload = json!({
                "project_id": id.0,
                "error": "project not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(DealServiceError::Intake(violation)) => {
            let payload = json!({
                "project_id": id.0,
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn matching_handler<P, N>(
    State(service): State<Arc<DealService<P, N>>>,
    axum::Json(request): axum::Json<MatchingRequest>,
) -> Response
where
    P: DealDataProvider + 'static,
    N: MatchNotifier + 'static,
{
    let policy = service.policy();
    let rule = format!("{}-deal rule", policy.display_cap);
    let min_score = request.min_score.unwrap_or(policy.min_score);

    if let Some(project_id) = request.project_id {
        let id = ProjectId(project_id);
        return match service.matches_for_project_above(&id, min_score) {
            Ok(limited) => {
                let payload = json!({
                    "subject_id": id.0,
                    "total_found": limited.total_found,
                    "cap": limited.cap,
                    "min_score": min_score,
                    "matches": limited.results,
                    "rule": rule,
                });
                (StatusCode::OK, axum::Json(payload)).into_response()
            }
            Err(error) => matching_error(&id.0, error),
        };
    }

    if let Some(counterparty_id) = request.counterparty_id {
        let id = CounterpartyId(counterparty_id);
        return match service.matches_for_counterparty_above(&id, min_score) {
            Ok(limited) => {
                let payload = json!({
                    "subject_id": id.0,
                    "total_found": limited.total_found,
                    "cap": limited.cap,
                    "min_score": min_score,
                    "matches": limited.results,
                    "rule": rule,
                });
                (StatusCode::OK, axum::Json(payload)).into_response()
            }
            Err(error) => matching_error(&id.0, error),
        };
    }

    let payload = json!({
        "error": "either project_id or counterparty_id is required",
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn matching_error(subject_id: &str, error: DealServiceError) -> Response {
    match error {
        DealServiceError::Provider(ProviderError::NotFound) => {
            let payload = json!({
                "subject_id": subject_id,
                "error": "record not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        DealServiceError::Intake(violation) => {
            let payload = json!({
                "subject_id": subject_id,
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        other => internal_error(other),
    }
}

fn internal_error(error: DealServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
