//! HTTP Handlers
//!
//! One handler per route. Each delegates to the `JobService` and maps its
//! errors through `ApiError`.

use crate::error::{ApiError, Operation};
use crate::types::{
    DataResponse, ErrorResponse, HealthResponse, ListJobsParams, ListResponse, MessageResponse,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use joblist_core::domain::validation::{parse_patch, MSG_INVALID_INPUT};
use joblist_core::domain::{JobId, JobQuery, JobRecord, JobStats, SortOrder, ValidationErrors};
use joblist_core::JobService;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<JobService>,
}

impl AppState {
    pub fn new(service: Arc<JobService>) -> Self {
        Self { service }
    }
}

/// A path segment that is not an integer can never name a job
fn parse_id(raw: &str) -> Result<JobId, ApiError> {
    raw.parse::<JobId>().map_err(|_| ApiError::NotFound)
}

/// Malformed or non-JSON bodies are reported like any other invalid payload
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ValidationErrors> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Rejected request body");
            Err(ValidationErrors::schema(MSG_INVALID_INPUT))
        }
    }
}

/// GET /api/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    params: Result<Query<ListJobsParams>, QueryRejection>,
) -> Result<Json<ListResponse<JobRecord>>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Rejected query string");
        ApiError::Validation(ValidationErrors::schema(MSG_INVALID_INPUT))
    })?;
    let sort = SortOrder::resolve(params.sort.as_deref());
    if sort == SortOrder::Unsorted {
        warn!(
            sort = params.sort.as_deref().unwrap_or_default(),
            "Unrecognized sort key, using store order"
        );
    }

    let query = JobQuery::new(params.filter(), sort);
    let jobs = state
        .service
        .list(&query)
        .await
        .map_err(|e| ApiError::from_app(Operation::ListJobs, e))?;

    Ok(Json(ListResponse::new(jobs)))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<JobRecord>>, ApiError> {
    let id = parse_id(&id)?;
    let job = state
        .service
        .get(id)
        .await
        .map_err(|e| ApiError::from_app(Operation::GetJob, e))?;

    Ok(Json(DataResponse::new(job)))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<JobRecord>>), ApiError> {
    let fields = json_body(payload).map_err(ApiError::Validation)?;
    let job = state
        .service
        .create(&fields)
        .await
        .map_err(|e| ApiError::from_app(Operation::CreateJob, e))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Job created successfully", job)),
    ))
}

/// PUT /api/jobs/{id}
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataResponse<JobRecord>>, ApiError> {
    let id = parse_id(&id)?;
    // an unreadable body is still checked against the id first
    let patch = json_body(payload).and_then(|fields| parse_patch(&fields));
    let job = state
        .service
        .update_parsed(id, patch)
        .await
        .map_err(|e| ApiError::from_app(Operation::UpdateJob, e))?;

    Ok(Json(DataResponse::with_message(
        "Job updated successfully",
        job,
    )))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    state
        .service
        .delete(id)
        .await
        .map_err(|e| ApiError::from_app(Operation::DeleteJob, e))?;

    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// GET /api/jobs/stats
pub async fn job_stats(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<JobStats>>, ApiError> {
    let stats = state
        .service
        .stats()
        .await
        .map_err(|e| ApiError::from_app(Operation::Stats, e))?;

    Ok(Json(DataResponse::new(stats)))
}

/// Unknown routes still answer with the error envelope
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Resource not found".to_string())),
    )
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "healthy",
        version: joblist_core::VERSION,
    })
}
