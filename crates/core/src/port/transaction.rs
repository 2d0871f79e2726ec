// Transaction port for atomic operations

use crate::domain::{JobId, JobRecord, UnsavedJob};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional JobRepository operations
#[async_trait]
pub trait TransactionalJobRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn JobRepositoryTransaction>>;
}

/// JobRepository operations within a transaction
#[async_trait]
pub trait JobRepositoryTransaction: Transaction {
    /// Insert job and return it with its assigned id
    async fn insert(&mut self, job: &UnsavedJob) -> Result<JobRecord>;

    /// Find job by ID (within transaction)
    async fn find_by_id(&mut self, id: JobId) -> Result<Option<JobRecord>>;

    /// Overwrite every mutable column of an existing job
    async fn update(&mut self, job: &JobRecord) -> Result<()>;

    /// Hard delete; `false` when no row had that id
    async fn delete(&mut self, id: JobId) -> Result<bool>;
}
