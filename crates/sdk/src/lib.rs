//! Joblist SDK - Rust Client Library
//!
//! Typed client for the job listings REST API, including the batch publish
//! used by scrapers to push freshly collected postings.
//!
//! # Example
//!
//! ```no_run
//! use joblist_sdk::{JobInput, JobListingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JobListingClient::connect("http://127.0.0.1:5000").await?;
//!
//!     let job = client
//!         .create_job(&JobInput {
//!             title: "Actuarial Analyst".to_string(),
//!             company: "Acme".to_string(),
//!             location: "New York, NY".to_string(),
//!             tags: vec!["life".to_string(), "pricing".to_string()],
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     println!("Job created: {}", job.id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::JobListingClient;
pub use error::{Result, SdkError};
pub use types::{
    HealthStatus, Job, JobInput, JobStats, JobUpdate, ListParams, PublishFailure, PublishReport,
};
