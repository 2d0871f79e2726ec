//! HTTP Request/Response Types
//!
//! Every response is wrapped in an envelope carrying a `success` flag.

use joblist_core::domain::{JobFilter, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/jobs`
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListJobsParams {
    pub fn filter(&self) -> JobFilter {
        JobFilter {
            job_type: self.job_type.clone(),
            location: self.location.clone(),
            tag: self.tag.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            success: false,
            message,
            errors: None,
        }
    }

    pub fn with_errors(message: String, errors: ValidationErrors) -> Self {
        Self {
            success: false,
            message,
            errors: Some(errors),
        }
    }
}

/// `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub version: &'static str,
}
