// Delete Use Case

use crate::domain::JobId;
use crate::error::{AppError, Result};
use crate::port::TransactionalJobRepository;

use super::finish;

/// Execute delete use case (hard delete, single transaction)
pub async fn execute(job_repo: &dyn TransactionalJobRepository, id: JobId) -> Result<()> {
    let mut tx = job_repo.begin_transaction().await?;
    let outcome = match tx.delete(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::job_not_found(id)),
        Err(e) => Err(e),
    };
    finish(tx, outcome).await
}
