//! Joblist CLI - Command-line interface for the job listings API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use joblist_sdk::{Job, JobInput, JobListingClient, JobUpdate, ListParams, SdkError};
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser)]
#[command(name = "joblist")]
#[command(about = "Job listings CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL
    #[arg(long, env = "JOBLIST_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs, optionally filtered and sorted
    List {
        /// Exact job type (e.g., Full-time, Internship)
        #[arg(short, long)]
        job_type: Option<String>,

        /// Location substring
        #[arg(short, long)]
        location: Option<String>,

        /// Tag substring
        #[arg(short, long)]
        tag: Option<String>,

        /// Text searched in title, company and description
        #[arg(short, long)]
        search: Option<String>,

        /// Sort key (e.g., posting_date_desc, title_asc)
        #[arg(long)]
        sort: Option<String>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one job
    Get {
        /// Job ID
        id: i64,
    },

    /// Create a job
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        location: String,

        /// Full-time, Part-time, Contract, Internship or Temporary
        #[arg(long)]
        job_type: Option<String>,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },

    /// Change fields of an existing job
    Update {
        /// Job ID
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        job_type: Option<String>,

        /// Comma-separated tags, replaces the current ones
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        #[arg(long, conflicts_with = "clear_url")]
        url: Option<String>,

        /// Remove the URL
        #[arg(long)]
        clear_url: bool,
    },

    /// Delete a job
    Delete {
        /// Job ID
        id: i64,
    },

    /// Show job counts per type
    Stats,

    /// Publish a JSON array of scraped jobs; rejected jobs are skipped
    Import {
        /// JSON file with an array of job objects
        file: PathBuf,
    },

    /// Check that the server is up
    Status,
}

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Type")]
    job_type: String,
    #[tabled(rename = "Posted")]
    posted: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            posted: job.posting_date.format("%Y-%m-%d").to_string(),
            tags: job.tags.join(", "),
        }
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Job Type")]
    job_type: String,
    #[tabled(rename = "Count")]
    count: i64,
}

/// Turn an SDK error into a readable message, spelling out field errors
fn describe(err: SdkError) -> anyhow::Error {
    let detail = err.validation_errors().map(|errors| {
        errors
            .iter()
            .map(|(field, messages)| format!("  {}: {}", field, messages.join(" ")))
            .collect::<Vec<_>>()
            .join("\n")
    });
    match detail {
        Some(detail) if !detail.is_empty() => anyhow::anyhow!("{}\n{}", err, detail),
        _ => anyhow::Error::new(err),
    }
}

fn print_job(job: &Job) {
    println!("{}", Table::new([JobRow::from(job)]));
    if let Some(description) = &job.description {
        println!("{} {}", "Description:".bold(), description);
    }
    if let Some(url) = &job.url {
        println!("{} {}", "URL:".bold(), url);
    }
    println!(
        "{} {}  {} {}",
        "Created:".bold(),
        job.created_at.to_rfc3339(),
        "Updated:".bold(),
        job.updated_at.to_rfc3339()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = JobListingClient::connect(&cli.api_url)
        .await
        .map_err(describe)?;

    match cli.command {
        Commands::List {
            job_type,
            location,
            tag,
            search,
            sort,
            json,
        } => {
            let params = ListParams {
                job_type,
                location,
                tag,
                search,
                sort,
            };
            let jobs = client.list_jobs(&params).await.map_err(describe)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else if jobs.is_empty() {
                println!("{}", "No jobs found".yellow());
            } else {
                let rows: Vec<JobRow> = jobs.iter().map(JobRow::from).collect();
                println!("{}", Table::new(rows));
                println!("{} job(s)", jobs.len());
            }
        }

        Commands::Get { id } => {
            let job = client.get_job(id).await.map_err(describe)?;
            print_job(&job);
        }

        Commands::Create {
            title,
            company,
            location,
            job_type,
            tags,
            description,
            url,
        } => {
            let input = JobInput {
                title,
                company,
                location,
                posting_date: None,
                job_type,
                tags,
                description,
                url,
            };
            let job = client.create_job(&input).await.map_err(describe)?;

            println!("{}", format!("✓ Job {} created", job.id).green().bold());
            println!();
            print_job(&job);
        }

        Commands::Update {
            id,
            title,
            company,
            location,
            job_type,
            tags,
            description,
            clear_description,
            url,
            clear_url,
        } => {
            let update = JobUpdate {
                title,
                company,
                location,
                posting_date: None,
                job_type,
                tags,
                description: if clear_description { Some(None) } else { description.map(Some) },
                url: if clear_url { Some(None) } else { url.map(Some) },
            };
            let job = client.update_job(id, &update).await.map_err(describe)?;

            println!("{}", format!("✓ Job {} updated", job.id).green().bold());
            println!();
            print_job(&job);
        }

        Commands::Delete { id } => {
            client.delete_job(id).await.map_err(describe)?;
            println!("{}", format!("✓ Job {} deleted", id).green().bold());
        }

        Commands::Stats => {
            let stats = client.stats().await.map_err(describe)?;

            println!("{} {}", "Total Jobs:".bold(), stats.total_jobs);
            if !stats.job_types.is_empty() {
                let rows: Vec<CountRow> = stats
                    .job_types
                    .into_iter()
                    .map(|(job_type, count)| CountRow { job_type, count })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let jobs: Vec<JobInput> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of jobs", file.display()))?;

            println!("{}", format!("Publishing {} job(s)...", jobs.len()).cyan().bold());
            let report = client.publish_batch(&jobs).await;

            println!("  {} {} created", "✓".green(), report.created.len());
            for failure in &report.failures {
                println!(
                    "  {} #{} {}: {}",
                    "✗".red(),
                    failure.index,
                    failure.title,
                    failure.message
                );
            }
            if !report.is_complete() {
                anyhow::bail!(
                    "{} of {} job(s) were rejected",
                    report.failures.len(),
                    report.submitted()
                );
            }
        }

        Commands::Status => {
            println!("  {} {}", "API URL:".bold(), cli.api_url);
            match client.health().await {
                Ok(health) => {
                    println!("  {} {}", "Status:".bold(), health.status.to_uppercase().green());
                    println!("  {} {}", "Version:".bold(), health.version);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "OFFLINE".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
