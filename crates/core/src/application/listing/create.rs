// Create Use Case

use crate::domain::{JobRecord, NewJob};
use crate::error::Result;
use crate::port::{TimeProvider, TransactionalJobRepository};

use super::finish;

/// Execute create use case (single transaction)
///
/// # Arguments
///
/// * `job_repo` - Transactional job repository
/// * `time_provider` - Time provider (injected for determinism)
/// * `job` - Validated create input
pub async fn execute(
    job_repo: &dyn TransactionalJobRepository,
    time_provider: &dyn TimeProvider,
    job: NewJob,
) -> Result<JobRecord> {
    let unsaved = job.stamp(time_provider.now());

    let mut tx = job_repo.begin_transaction().await?;
    let outcome = tx.insert(&unsaved).await;
    finish(tx, outcome).await
}
