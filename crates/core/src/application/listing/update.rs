// Partial Update Use Case

use crate::domain::{JobId, JobPatch, JobRecord, ValidationErrors};
use crate::error::{AppError, Result};
use crate::port::{JobRepositoryTransaction, TimeProvider, TransactionalJobRepository};

use super::finish;

/// Execute update use case (single transaction)
///
/// An unknown id wins over a validation failure; nothing is written in
/// either case.
pub async fn execute(
    job_repo: &dyn TransactionalJobRepository,
    time_provider: &dyn TimeProvider,
    id: JobId,
    patch: std::result::Result<JobPatch, ValidationErrors>,
) -> Result<JobRecord> {
    let mut tx = job_repo.begin_transaction().await?;
    let outcome = apply(&mut tx, time_provider, id, patch).await;
    finish(tx, outcome).await
}

async fn apply(
    tx: &mut Box<dyn JobRepositoryTransaction>,
    time_provider: &dyn TimeProvider,
    id: JobId,
    patch: std::result::Result<JobPatch, ValidationErrors>,
) -> Result<JobRecord> {
    let mut job = tx
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::job_not_found(id))?;

    job.apply(patch?);
    job.touch(time_provider.now());
    tx.update(&job).await?;

    Ok(job)
}
