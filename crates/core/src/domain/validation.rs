//! Payload validation for creates and partial updates.
//!
//! Input arrives as loosely typed JSON. Every field is checked on its own and
//! all violations are collected, so a client sees the full list of problems
//! in one response.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::error::ValidationErrors;
use super::job::{JobPatch, JobType, NewJob, MAX_TEXT_LEN, MAX_URL_LEN};

pub const MSG_REQUIRED: &str = "Missing data for required field.";
pub const MSG_NULL: &str = "Field may not be null.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NOT_DATETIME: &str = "Not a valid datetime.";
pub const MSG_NOT_TAGS: &str = "Not a valid list of strings.";
pub const MSG_UNKNOWN_FIELD: &str = "Unknown field.";
pub const MSG_INVALID_INPUT: &str = "Invalid input type.";

/// Fields a client may send
const KNOWN_FIELDS: [&str; 8] = [
    "title",
    "company",
    "location",
    "posting_date",
    "job_type",
    "tags",
    "description",
    "url",
];

/// Store-managed fields: accepted in a payload and silently ignored
const IGNORED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Validate a create payload
pub fn parse_new_job(input: &Value) -> Result<NewJob, ValidationErrors> {
    let map = as_object(input)?;
    let mut errors = ValidationErrors::new();
    check_unknown_fields(map, &mut errors);

    let title = read_text(map, "title", &mut errors);
    let company = read_text(map, "company", &mut errors);
    let location = read_text(map, "location", &mut errors);
    require(map, &["title", "company", "location"], &mut errors);

    let job = NewJob {
        title: title.unwrap_or_default(),
        company: company.unwrap_or_default(),
        location: location.unwrap_or_default(),
        posting_date: read_datetime(map, "posting_date", &mut errors),
        job_type: read_job_type(map, &mut errors).unwrap_or_default(),
        tags: read_tags(map, &mut errors).unwrap_or_default(),
        description: read_optional_text(map, "description", None, &mut errors).flatten(),
        url: read_optional_text(map, "url", Some(MAX_URL_LEN), &mut errors).flatten(),
    };

    errors.into_result(job)
}

/// Validate an update payload. Only supplied fields are checked.
pub fn parse_patch(input: &Value) -> Result<JobPatch, ValidationErrors> {
    let map = as_object(input)?;
    let mut errors = ValidationErrors::new();
    check_unknown_fields(map, &mut errors);

    let patch = JobPatch {
        title: read_text(map, "title", &mut errors),
        company: read_text(map, "company", &mut errors),
        location: read_text(map, "location", &mut errors),
        posting_date: read_datetime(map, "posting_date", &mut errors),
        job_type: read_job_type(map, &mut errors),
        tags: read_tags(map, &mut errors),
        description: read_optional_text(map, "description", None, &mut errors),
        url: read_optional_text(map, "url", Some(MAX_URL_LEN), &mut errors),
    };

    errors.into_result(patch)
}

/// Split a comma-joined tag string or flatten a list of tags. Pieces are
/// trimmed and empty ones dropped, so the result never contains a comma.
pub fn normalize_tags<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .flat_map(|chunk| chunk.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    input
        .as_object()
        .ok_or_else(|| ValidationErrors::schema(MSG_INVALID_INPUT))
}

fn check_unknown_fields(map: &Map<String, Value>, errors: &mut ValidationErrors) {
    for key in map.keys() {
        let key = key.as_str();
        if !KNOWN_FIELDS.contains(&key) && !IGNORED_FIELDS.contains(&key) {
            errors.add(key, MSG_UNKNOWN_FIELD);
        }
    }
}

fn require(map: &Map<String, Value>, fields: &[&str], errors: &mut ValidationErrors) {
    for field in fields {
        if !map.contains_key(*field) {
            errors.add(*field, MSG_REQUIRED);
        }
    }
}

/// Non-nullable bounded text (title, company, location)
fn read_text(map: &Map<String, Value>, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    match map.get(field)? {
        Value::Null => {
            errors.add(field, MSG_NULL);
            None
        }
        Value::String(s) => {
            let len = s.chars().count();
            if len == 0 || len > MAX_TEXT_LEN {
                errors.add(
                    field,
                    format!("Length must be between 1 and {}.", MAX_TEXT_LEN),
                );
                None
            } else {
                Some(s.clone())
            }
        }
        _ => {
            errors.add(field, MSG_NOT_STRING);
            None
        }
    }
}

/// Nullable text. Outer `None`: field absent or invalid.
fn read_optional_text(
    map: &Map<String, Value>,
    field: &str,
    max_len: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<Option<String>> {
    match map.get(field)? {
        Value::Null => Some(None),
        Value::String(s) => match max_len {
            Some(max) if s.chars().count() > max => {
                errors.add(field, format!("Longer than maximum length {}.", max));
                None
            }
            _ => Some(Some(s.clone())),
        },
        _ => {
            errors.add(field, MSG_NOT_STRING);
            None
        }
    }
}

fn read_job_type(map: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<JobType> {
    const FIELD: &str = "job_type";
    match map.get(FIELD)? {
        Value::Null => {
            errors.add(FIELD, MSG_NULL);
            None
        }
        Value::String(s) => match s.parse::<JobType>() {
            Ok(job_type) => Some(job_type),
            Err(_) => {
                let choices: Vec<&str> = JobType::ALL.iter().map(JobType::as_str).collect();
                errors.add(FIELD, format!("Must be one of: {}.", choices.join(", ")));
                None
            }
        },
        _ => {
            errors.add(FIELD, MSG_NOT_STRING);
            None
        }
    }
}

fn read_datetime(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<DateTime<Utc>> {
    match map.get(field)? {
        Value::Null => {
            errors.add(field, MSG_NULL);
            None
        }
        Value::String(s) => match parse_timestamp(s) {
            Some(ts) => Some(ts),
            None => {
                errors.add(field, MSG_NOT_DATETIME);
                None
            }
        },
        _ => {
            errors.add(field, MSG_NOT_DATETIME);
            None
        }
    }
}

fn read_tags(map: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<Vec<String>> {
    const FIELD: &str = "tags";
    match map.get(FIELD)? {
        Value::Null => Some(Vec::new()),
        Value::String(s) => Some(normalize_tags([s.as_str()])),
        Value::Array(items) => {
            let strings: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            match strings {
                Some(strings) => Some(normalize_tags(strings)),
                None => {
                    errors.add(FIELD, MSG_NOT_TAGS);
                    None
                }
            }
        }
        _ => {
            errors.add(FIELD, MSG_NOT_TAGS);
            None
        }
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC. Truncated to
/// millisecond precision, which is what the store keeps.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|n| n.and_utc()))
        .ok()?;
    DateTime::from_timestamp_millis(parsed.timestamp_millis())
}
