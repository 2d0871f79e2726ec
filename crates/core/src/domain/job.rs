// Job Domain Model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Job ID (store-assigned, never reused)
pub type JobId = i64;

/// Upper bound for title, company and location (characters)
pub const MAX_TEXT_LEN: usize = 200;

/// Upper bound for the posting URL (characters)
pub const MAX_URL_LEN: usize = 500;

/// Employment type of a posting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Temporary,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Temporary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
            JobType::Temporary => "Temporary",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownJobType(s.to_string()))
    }
}

/// Persisted job posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posting_date: DateTime<Utc>,
    pub job_type: JobType,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Apply every field present in the patch; absent fields keep their value.
    pub fn apply(&mut self, patch: JobPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(posting_date) = patch.posting_date {
            self.posting_date = posting_date;
        }
        if let Some(job_type) = patch.job_type {
            self.job_type = job_type;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
    }

    /// Refresh `updated_at`. Always moves forward by at least 1ms so that
    /// consecutive mutations are ordered even on a coarse or stalled clock.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::milliseconds(1);
        self.updated_at = now.max(floor);
    }
}

/// Validated input for a create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posting_date: Option<DateTime<Utc>>,
    pub job_type: JobType,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl NewJob {
    /// Stamp creation time; `posting_date` falls back to `now`.
    pub fn stamp(self, now: DateTime<Utc>) -> UnsavedJob {
        UnsavedJob {
            title: self.title,
            company: self.company,
            location: self.location,
            posting_date: self.posting_date.unwrap_or(now),
            job_type: self.job_type,
            tags: self.tags,
            description: self.description,
            url: self.url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A fully populated job that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsavedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posting_date: DateTime<Utc>,
    pub job_type: JobType,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnsavedJob {
    pub fn with_id(self, id: JobId) -> JobRecord {
        JobRecord {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            posting_date: self.posting_date,
            job_type: self.job_type,
            tags: self.tags,
            description: self.description,
            url: self.url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Validated partial update. This is the complete list of updatable fields;
/// `id`, `created_at` and `updated_at` are deliberately absent.
///
/// For nullable columns the outer `Option` means "supplied", the inner one is
/// the new value (`Some(None)` clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posting_date: Option<DateTime<Utc>>,
    pub job_type: Option<JobType>,
    pub tags: Option<Vec<String>>,
    pub description: Option<Option<String>>,
    pub url: Option<Option<String>>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        *self == JobPatch::default()
    }
}
