// Row <-> domain mapping. Tags are stored comma-joined, timestamps as epoch ms.

use chrono::{DateTime, Utc};
use joblist_core::domain::{DomainError, JobRecord, JobType};
use joblist_core::error::{AppError, Result};

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobRow {
    id: i64,
    title: String,
    company: String,
    location: String,
    posting_date: i64,
    job_type: String,
    tags: Option<String>,
    description: Option<String>,
    url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl JobRow {
    pub(crate) fn into_record(self) -> Result<JobRecord> {
        let job_type: JobType = self.job_type.parse().map_err(|e: DomainError| {
            AppError::Database(format!("Corrupt row {}: {}", self.id, e))
        })?;

        Ok(JobRecord {
            id: self.id,
            title: self.title,
            company: self.company,
            location: self.location,
            posting_date: from_millis(self.posting_date)?,
            job_type,
            tags: decode_tags(self.tags.as_deref()),
            description: self.description,
            url: self.url,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

pub(crate) fn encode_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

pub(crate) fn decode_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| DomainError::InvalidTimestamp(ms).into())
}
