//! Job Listing Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    Envelope, HealthStatus, Job, JobInput, JobStats, JobUpdate, ListParams, PublishFailure,
    PublishReport,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};

/// Client for the job listings HTTP API
///
/// # Example
///
/// ```no_run
/// use joblist_sdk::JobListingClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JobListingClient::connect("http://127.0.0.1:5000").await?;
/// let stats = client.stats().await?;
/// println!("{} jobs", stats.total_jobs);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JobListingClient {
    client: Client,
    base_url: Url,
}

impl JobListingClient {
    /// Create a client for the API at `url` (e.g., `http://127.0.0.1:5000`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        let base_url = Url::parse(url).map_err(|e| SdkError::InvalidUrl(format!("{}: {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SdkError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// List jobs matching `params`
    pub async fn list_jobs(&self, params: &ListParams) -> Result<Vec<Job>> {
        let response = self
            .client
            .get(self.endpoint("/api/jobs")?)
            .query(params)
            .send()
            .await?;
        data(response).await
    }

    pub async fn get_job(&self, id: i64) -> Result<Job> {
        let response = self
            .client
            .get(self.endpoint(&format!("/api/jobs/{}", id))?)
            .send()
            .await?;
        data(response).await
    }

    pub async fn create_job(&self, job: &JobInput) -> Result<Job> {
        let response = self
            .client
            .post(self.endpoint("/api/jobs")?)
            .json(job)
            .send()
            .await?;
        data(response).await
    }

    pub async fn update_job(&self, id: i64, update: &JobUpdate) -> Result<Job> {
        let response = self
            .client
            .put(self.endpoint(&format!("/api/jobs/{}", id))?)
            .json(update)
            .send()
            .await?;
        data(response).await
    }

    pub async fn delete_job(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/api/jobs/{}", id))?)
            .send()
            .await?;
        envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<JobStats> {
        let response = self
            .client
            .get(self.endpoint("/api/jobs/stats")?)
            .send()
            .await?;
        data(response).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.endpoint("/api/health")?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Submit jobs one by one. Only `201 Created` counts as success; any
    /// other outcome is logged and the job skipped. Nothing is retried.
    pub async fn publish_batch(&self, jobs: &[JobInput]) -> PublishReport {
        let mut report = PublishReport::default();

        for (index, job) in jobs.iter().enumerate() {
            match self.publish_one(job).await {
                Ok(id) => {
                    info!(index, job_id = id, title = %job.title, "Job published");
                    report.created.push(id);
                }
                Err(e) => {
                    warn!(index, title = %job.title, error = %e, "Job rejected, skipping");
                    report.failures.push(PublishFailure {
                        index,
                        title: job.title.clone(),
                        status: e.status(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            created = report.created.len(),
            failed = report.failures.len(),
            "Batch publish finished"
        );
        report
    }

    async fn publish_one(&self, job: &JobInput) -> Result<i64> {
        let response = self
            .client
            .post(self.endpoint("/api/jobs")?)
            .json(job)
            .send()
            .await?;
        if response.status() != StatusCode::CREATED {
            return Err(api_error(response).await);
        }
        let created: Envelope<Job> = response.json().await?;
        created
            .data
            .map(|job| job.id)
            .ok_or_else(|| SdkError::UnexpectedResponse("created job missing from response".to_string()))
    }
}

async fn envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

async fn data<T: DeserializeOwned>(response: Response) -> Result<T> {
    envelope(response)
        .await?
        .data
        .ok_or_else(|| SdkError::UnexpectedResponse("response has no data".to_string()))
}

/// Decode the error envelope, falling back to the raw body
async fn api_error(response: Response) -> SdkError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return SdkError::Transport(e),
    };

    match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
        Ok(envelope) => SdkError::Api {
            status,
            message: envelope.message.unwrap_or(body),
            errors: envelope.errors,
        },
        Err(_) => SdkError::Api {
            status,
            message: body,
            errors: Default::default(),
        },
    }
}
