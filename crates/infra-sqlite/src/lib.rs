// Joblist Infrastructure - SQLite Adapter
// Implements: JobRepository, TransactionalJobRepository

mod connection;
mod job_repository;
mod migration;
mod row;
mod transaction;

pub use connection::{create_pool, create_pool_with};
pub use job_repository::SqliteJobRepository;
pub use migration::run_migrations;
pub use transaction::SqliteJobTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
