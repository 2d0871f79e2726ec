//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use joblist_api_http::{HttpServer, HttpServerConfig, ServerHandle};
use joblist_core::port::time_provider::SystemTimeProvider;
use joblist_core::JobService;
use joblist_infra_sqlite::{create_pool, run_migrations, SqliteJobRepository};
use serde_json::{json, Value};

/// Service over a migrated database at `url`
pub async fn service_at(url: &str) -> Arc<JobService> {
    let pool = create_pool(url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let repo = Arc::new(SqliteJobRepository::new(pool));
    Arc::new(JobService::new(
        repo.clone(),
        repo,
        Arc::new(SystemTimeProvider),
    ))
}

pub async fn memory_service() -> Arc<JobService> {
    service_at("sqlite::memory:").await
}

/// Real TCP server on an ephemeral port
pub async fn start_server(service: Arc<JobService>) -> ServerHandle {
    let config = HttpServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    HttpServer::new(config, service).start().await.unwrap()
}

pub fn job(title: &str, company: &str, location: &str, job_type: &str) -> Value {
    json!({
        "title": title,
        "company": company,
        "location": location,
        "job_type": job_type
    })
}

/// Five postings covering every filter dimension
pub fn catalog() -> Vec<Value> {
    vec![
        json!({
            "title": "Actuarial Analyst",
            "company": "Acme Insurance",
            "location": "New York, NY",
            "job_type": "Full-time",
            "posting_date": "2024-05-03T09:00:00Z",
            "tags": "life, pricing"
        }),
        json!({
            "title": "Pricing Actuary",
            "company": "Beta Re",
            "location": "Remote",
            "job_type": "Contract",
            "posting_date": "2024-05-05T09:00:00Z",
            "tags": ["p&c"]
        }),
        json!({
            "title": "Summer Intern",
            "company": "Gamma Mutual",
            "location": "Hartford, CT",
            "job_type": "Internship",
            "posting_date": "2024-05-01T09:00:00Z",
            "tags": ["student"],
            "description": "Join our ACTUARY team for ten weeks"
        }),
        json!({
            "title": "Data Scientist",
            "company": "Delta Analytics",
            "location": "remote - US",
            "job_type": "Part-time",
            "posting_date": "2024-05-04T09:00:00Z"
        }),
        json!({
            "title": "Analyst",
            "company": "Zeta Actuaries",
            "location": "Chicago, IL",
            "job_type": "Internship",
            "posting_date": "2024-05-05T09:00:00Z",
            "tags": "life"
        }),
    ]
}
