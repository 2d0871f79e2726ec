// SQLite JobRepository Implementation

use crate::row::JobRow;
use crate::SqliteJobTransaction;
use async_trait::async_trait;
use joblist_core::domain::{JobId, JobQuery, JobRecord, SortOrder};
use joblist_core::error::{AppError, Result};
use joblist_core::port::{JobRepository, JobRepositoryTransaction, TransactionalJobRepository};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeMap;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract database-specific error code and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed
                        AppError::Database(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "275" => {
                        // CHECK constraint failed
                        AppError::Database(format!(
                            "Check constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => {
                        // SQLITE_FULL - database or disk is full
                        AppError::Database(format!("Database full: {}", db_err.message()))
                    }
                    _ => {
                        // Other database errors
                        AppError::Database(format!(
                            "Database error [{}]: {}",
                            code_str,
                            db_err.message()
                        ))
                    }
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

/// Treat `%`, `_` and `\` in user input literally
const LIKE_ESCAPE: &str = r" ESCAPE '\'";

fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn order_by(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::PostingDateDesc => " ORDER BY posting_date DESC, id ASC",
        SortOrder::PostingDateAsc => " ORDER BY posting_date ASC, id ASC",
        SortOrder::TitleAsc => " ORDER BY title ASC, id ASC",
        SortOrder::TitleDesc => " ORDER BY title DESC, id ASC",
        SortOrder::CompanyAsc => " ORDER BY company ASC, id ASC",
        SortOrder::CompanyDesc => " ORDER BY company DESC, id ASC",
        SortOrder::Unsorted => " ORDER BY id ASC",
    }
}

/// Build the listing SELECT. SQLite's LIKE is case-insensitive for ASCII.
fn build_list_query(query: &JobQuery) -> QueryBuilder<'static, Sqlite> {
    let filter = &query.filter;
    let mut builder = QueryBuilder::new("SELECT * FROM jobs WHERE 1 = 1");

    if let Some(job_type) = &filter.job_type {
        builder.push(" AND job_type = ").push_bind(job_type.clone());
    }
    if let Some(location) = &filter.location {
        builder
            .push(" AND location LIKE ")
            .push_bind(like_pattern(location))
            .push(LIKE_ESCAPE);
    }
    if let Some(tag) = &filter.tag {
        builder
            .push(" AND tags LIKE ")
            .push_bind(like_pattern(tag))
            .push(LIKE_ESCAPE);
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR company LIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }

    builder.push(order_by(query.sort));
    builder
}

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn find_by_id(&self, id: JobId) -> Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_record).transpose()
    }

    async fn list(&self, query: &JobQuery) -> Result<Vec<JobRecord>> {
        let mut builder = build_list_query(query);
        let rows: Vec<JobRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_record).collect()
    }

    async fn count_by_job_type(&self) -> Result<BTreeMap<String, i64>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT job_type, COUNT(*) FROM jobs GROUP BY job_type")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().collect())
    }
}

#[async_trait]
impl TransactionalJobRepository for SqliteJobRepository {
    /// Write transactions take the write lock up front. A deferred
    /// transaction that reads first cannot upgrade its WAL snapshot once
    /// another writer commits, and fails with SQLITE_BUSY regardless of the
    /// busy timeout.
    async fn begin_transaction(&self) -> Result<Box<dyn JobRepositoryTransaction>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteJobTransaction::new(tx)))
    }
}
