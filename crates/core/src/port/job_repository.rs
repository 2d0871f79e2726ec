// Job Repository Port (Interface)

use crate::domain::{JobId, JobQuery, JobRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Read-side repository interface for job persistence.
/// Mutations go through [`crate::port::TransactionalJobRepository`].
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Find job by ID
    async fn find_by_id(&self, id: JobId) -> Result<Option<JobRecord>>;

    /// All jobs matching the query's filter, in the query's order
    async fn list(&self, query: &JobQuery) -> Result<Vec<JobRecord>>;

    /// Number of jobs per stored job type, read in a single query
    async fn count_by_job_type(&self) -> Result<BTreeMap<String, i64>>;
}
