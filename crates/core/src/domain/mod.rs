// Domain Layer - Pure business logic and entities

pub mod error;
pub mod job;
pub mod query;
pub mod validation;

// Re-exports
pub use error::{DomainError, ValidationErrors};
pub use job::{JobId, JobPatch, JobRecord, JobType, NewJob, UnsavedJob, MAX_TEXT_LEN, MAX_URL_LEN};
pub use query::{JobFilter, JobQuery, JobStats, SortOrder};
