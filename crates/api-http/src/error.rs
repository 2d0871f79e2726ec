//! API Error Types
//!
//! Maps application errors to HTTP status codes and the
//! `{success: false, message}` envelope.

use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use joblist_core::domain::ValidationErrors;
use joblist_core::error::AppError;
use thiserror::Error;
use tracing::error;

/// Endpoint an error came from. Selects the message prefix of a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListJobs,
    GetJob,
    CreateJob,
    UpdateJob,
    DeleteJob,
    Stats,
}

impl Operation {
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::ListJobs => "Error fetching jobs",
            Operation::GetJob => "Error fetching job",
            Operation::CreateJob => "Error creating job",
            Operation::UpdateJob => "Error updating job",
            Operation::DeleteJob => "Error deleting job",
            Operation::Stats => "Error fetching stats",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error("Job not found")]
    NotFound,

    #[error("{}: {source}", .operation.failure_prefix())]
    Internal {
        operation: Operation,
        source: AppError,
    },
}

impl ApiError {
    pub fn from_app(operation: Operation, err: AppError) -> Self {
        match err {
            AppError::Validation(errors) => ApiError::Validation(errors),
            AppError::NotFound(_) => ApiError::NotFound,
            source => ApiError::Internal { operation, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            ApiError::Validation(errors) => ErrorResponse::with_errors(message, errors),
            ApiError::NotFound => ErrorResponse::new(message),
            ApiError::Internal { operation, source } => {
                error!(?operation, error = %source, "Request failed");
                ErrorResponse::new(message)
            }
        };
        (status, Json(body)).into_response()
    }
}
