// Listing query: filter predicates, sort order, aggregate stats

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::job::JobRecord;

/// Filter clauses for a listing. Every clause is optional; present clauses
/// are combined with AND.
///
/// Text clauses are case-insensitive substring matches (ASCII case folding,
/// the same folding SQLite's `LIKE` applies).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Exact match on the job type name
    pub job_type: Option<String>,
    pub location: Option<String>,
    /// Matched against the whole tag list as one comma-joined string, so a
    /// value may span a tag boundary
    pub tag: Option<String>,
    /// Matched against title, company or description
    pub search: Option<String>,
}

impl JobFilter {
    /// Drop empty clauses (an empty query parameter means "no filter")
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            job_type: keep(self.job_type),
            location: keep(self.location),
            tag: keep(self.tag),
            search: keep(self.search),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.job_type.is_none()
            && self.location.is_none()
            && self.tag.is_none()
            && self.search.is_none()
    }

    /// In-process evaluation of the filter
    pub fn matches(&self, job: &JobRecord) -> bool {
        if let Some(job_type) = &self.job_type {
            if job.job_type.as_str() != job_type {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_folded(&job.location, location) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !contains_folded(&job.tags.join(","), tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let hit = contains_folded(&job.title, search)
                || contains_folded(&job.company, search)
                || job
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_folded(d, search));
            if !hit {
                return false;
            }
        }
        true
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Result ordering. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    PostingDateDesc,
    PostingDateAsc,
    TitleAsc,
    TitleDesc,
    CompanyAsc,
    CompanyDesc,
    /// Store default order (ascending id), used for unrecognized sort keys
    Unsorted,
}

impl SortOrder {
    pub const KEYS: [SortOrder; 6] = [
        SortOrder::PostingDateDesc,
        SortOrder::PostingDateAsc,
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
        SortOrder::CompanyAsc,
        SortOrder::CompanyDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PostingDateDesc => "posting_date_desc",
            SortOrder::PostingDateAsc => "posting_date_asc",
            SortOrder::TitleAsc => "title_asc",
            SortOrder::TitleDesc => "title_desc",
            SortOrder::CompanyAsc => "company_asc",
            SortOrder::CompanyDesc => "company_desc",
            SortOrder::Unsorted => "unsorted",
        }
    }

    /// Look up a sort key. Accepts `posting_date_desc` style keys and the
    /// `postingDate-desc` style aliases.
    pub fn from_key(key: &str) -> Option<SortOrder> {
        let order = match key {
            "posting_date_desc" | "postingDate-desc" => SortOrder::PostingDateDesc,
            "posting_date_asc" | "postingDate-asc" => SortOrder::PostingDateAsc,
            "title_asc" | "title-asc" => SortOrder::TitleAsc,
            "title_desc" | "title-desc" => SortOrder::TitleDesc,
            "company_asc" | "company-asc" => SortOrder::CompanyAsc,
            "company_desc" | "company-desc" => SortOrder::CompanyDesc,
            _ => return None,
        };
        Some(order)
    }

    /// Resolve an optional request value. Missing or empty means the default
    /// order; anything unrecognized falls back to `Unsorted`.
    pub fn resolve(raw: Option<&str>) -> SortOrder {
        match raw {
            None | Some("") => SortOrder::default(),
            Some(key) => SortOrder::from_key(key).unwrap_or(SortOrder::Unsorted),
        }
    }

    /// In-process comparator equivalent to the store's ORDER BY
    pub fn compare(&self, a: &JobRecord, b: &JobRecord) -> Ordering {
        let primary = match self {
            SortOrder::PostingDateDesc => b.posting_date.cmp(&a.posting_date),
            SortOrder::PostingDateAsc => a.posting_date.cmp(&b.posting_date),
            SortOrder::TitleAsc => a.title.cmp(&b.title),
            SortOrder::TitleDesc => b.title.cmp(&a.title),
            SortOrder::CompanyAsc => a.company.cmp(&b.company),
            SortOrder::CompanyDesc => b.company.cmp(&a.company),
            SortOrder::Unsorted => Ordering::Equal,
        };
        primary.then(a.id.cmp(&b.id))
    }
}

/// Filter + sort for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub filter: JobFilter,
    pub sort: SortOrder,
}

impl JobQuery {
    pub fn new(filter: JobFilter, sort: SortOrder) -> Self {
        Self {
            filter: filter.normalized(),
            sort,
        }
    }
}

/// Aggregate counts over the whole store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total_jobs: i64,
    /// Count per job type, only for types that are present
    pub job_types: BTreeMap<String, i64>,
}
