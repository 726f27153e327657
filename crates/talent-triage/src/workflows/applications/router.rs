use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::automation::AutomationSettings;
use super::domain::{JobId, RecruiterId};
use super::repository::{ApplicationStore, JobRepository, NotificationSender};
use super::run::AutomationRunRequest;
use super::service::{BatchRequest, TriageError, TriageService};
use crate::workflows::matching::ScoreInput;

/// Header carrying the authenticated recruiter profile id, set by the upstream gateway.
pub const RECRUITER_HEADER: &str = "x-recruiter-id";

/// Router builder exposing scoring, automation, and batch status endpoints.
pub fn triage_router<A, J, N>(service: Arc<TriageService<A, J, N>>) -> Router
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route("/api/v1/matching/score", post(score_handler::<A, J, N>))
        .route(
            "/api/v1/jobs/:job_id/automation",
            get(automation_config_handler::<A, J, N>).put(configure_automation_handler::<A, J, N>),
        )
        .route(
            "/api/v1/jobs/:job_id/automation/run",
            post(run_automation_handler::<A, J, N>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/batch",
            post(batch_handler::<A, J, N>),
        )
        .with_state(service)
}

fn requester(headers: &HeaderMap) -> Result<RecruiterId, Response> {
    headers
        .get(RECRUITER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| RecruiterId(value.to_string()))
        .ok_or_else(|| {
            let payload = json!({ "error": "authentication required" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        })
}

fn error_response(error: TriageError) -> Response {
    match error {
        TriageError::Input(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        TriageError::JobNotFound(job_id) => {
            let payload = json!({
                "error": "job not found",
                "jobId": job_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        TriageError::Repository(repository) => {
            error!(error = %repository, "triage request failed on storage");
            let payload = json!({ "error": repository.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn score_handler<A, J, N>(
    State(service): State<Arc<TriageService<A, J, N>>>,
    axum::Json(input): axum::Json<ScoreInput>,
) -> Response
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.score(&input) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn automation_config_handler<A, J, N>(
    State(service): State<Arc<TriageService<A, J, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    let requester = match requester(&headers) {
        Ok(requester) => requester,
        Err(response) => return response,
    };

    match service.automation_config(&requester, &JobId(job_id)) {
        Ok(config) => (StatusCode::OK, axum::Json(config)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn configure_automation_handler<A, J, N>(
    State(service): State<Arc<TriageService<A, J, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(settings): axum::Json<AutomationSettings>,
) -> Response
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    let requester = match requester(&headers) {
        Ok(requester) => requester,
        Err(response) => return response,
    };

    match service.configure_automation(&requester, &JobId(job_id), &settings) {
        Ok(config) => (StatusCode::OK, axum::Json(config)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn run_automation_handler<A, J, N>(
    State(service): State<Arc<TriageService<A, J, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<AutomationRunRequest>,
) -> Response
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    let requester = match requester(&headers) {
        Ok(requester) => requester,
        Err(response) => return response,
    };

    match service.run_automation(&requester, &JobId(job_id), &request.applications) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_handler<A, J, N>(
    State(service): State<Arc<TriageService<A, J, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    let requester = match requester(&headers) {
        Ok(requester) => requester,
        Err(response) => return response,
    };

    match service.apply_batch_action(&requester, &JobId(job_id), &request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}
