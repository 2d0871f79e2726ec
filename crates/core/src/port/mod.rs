// Port Layer - Interfaces for external dependencies

pub mod job_repository;
pub mod time_provider; // For deterministic testing
pub mod transaction;

// Re-exports
pub use job_repository::JobRepository;
pub use time_provider::TimeProvider;
pub use transaction::{JobRepositoryTransaction, Transaction, TransactionalJobRepository};
