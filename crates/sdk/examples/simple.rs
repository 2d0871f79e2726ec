//! Simple SDK Example
//!
//! Creates a posting, narrows the listing with a filter, then cleans up.
//!
//! # Usage
//!
//! 1. Start the server:
//!    ```bash
//!    cargo run --package joblist-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use joblist_sdk::{JobInput, JobListingClient, JobUpdate, ListParams};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Joblist SDK - Simple Example");
    println!("============================\n");

    // 1. Connect
    let client = JobListingClient::connect("http://127.0.0.1:5000").await?;
    let health = client.health().await?;
    println!("1. Server {} (v{})\n", health.status, health.version);

    // 2. Create a job
    let job = client
        .create_job(&JobInput {
            title: "Actuarial Analyst".to_string(),
            company: "Acme Insurance".to_string(),
            location: "New York, NY".to_string(),
            job_type: Some("Full-time".to_string()),
            tags: vec!["life".to_string(), "pricing".to_string()],
            ..Default::default()
        })
        .await?;
    println!("2. Created job {} ({})\n", job.id, job.title);

    // 3. Search
    let found = client
        .list_jobs(&ListParams {
            search: Some("actuarial".to_string()),
            sort: Some("title_asc".to_string()),
            ..Default::default()
        })
        .await?;
    println!("3. Search returned {} job(s)", found.len());
    for job in &found {
        println!("   - [{}] {} @ {}", job.id, job.title, job.company);
    }
    println!();

    // 4. Move it to remote
    let updated = client
        .update_job(
            job.id,
            &JobUpdate {
                location: Some("Remote".to_string()),
                ..Default::default()
            },
        )
        .await?;
    println!("4. Location is now {}\n", updated.location);

    // 5. Delete
    client.delete_job(job.id).await?;
    println!("5. Deleted job {}", job.id);

    Ok(())
}
