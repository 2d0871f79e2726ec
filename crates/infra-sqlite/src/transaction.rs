// SQLite Transaction Implementation

use crate::job_repository::map_sqlx_error;
use crate::row::{encode_tags, JobRow};
use async_trait::async_trait;
use joblist_core::domain::{JobId, JobRecord, UnsavedJob};
use joblist_core::error::{AppError, Result};
use joblist_core::port::{JobRepositoryTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

pub struct SqliteJobTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteJobTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteJobTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl JobRepositoryTransaction for SqliteJobTransaction<'_> {
    async fn insert(&mut self, job: &UnsavedJob) -> Result<JobRecord> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                title, company, location, posting_date, job_type,
                tags, description, url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.posting_date.timestamp_millis())
        .bind(job.job_type.as_str())
        .bind(encode_tags(&job.tags))
        .bind(&job.description)
        .bind(&job.url)
        .bind(job.created_at.timestamp_millis())
        .bind(job.updated_at.timestamp_millis())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.into_record()
    }

    async fn find_by_id(&mut self, id: JobId) -> Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_record).transpose()
    }

    async fn update(&mut self, job: &JobRecord) -> Result<()> {
        // id and created_at are never written after insert
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = ?, company = ?, location = ?, posting_date = ?, job_type = ?,
                tags = ?, description = ?, url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.posting_date.timestamp_millis())
        .bind(job.job_type.as_str())
        .bind(encode_tags(&job.tags))
        .bind(&job.description)
        .bind(&job.url)
        .bind(job.updated_at.timestamp_millis())
        .bind(job.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::job_not_found(job.id));
        }
        Ok(())
    }

    async fn delete(&mut self, id: JobId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{create_pool, run_migrations, SqliteJobRepository};
    use chrono::{TimeZone, Utc};
    use joblist_core::domain::{JobPatch, NewJob, UnsavedJob};
    use joblist_core::port::{JobRepository, TransactionalJobRepository};

    async fn setup() -> SqliteJobRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteJobRepository::new(pool)
    }

    fn sample() -> UnsavedJob {
        NewJob {
            title: "Actuarial Analyst".to_string(),
            company: "Acme".to_string(),
            location: "NY".to_string(),
            tags: vec!["life".to_string()],
            ..Default::default()
        }
        .stamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_rollback_discards_insert() {
        let repo = setup().await;

        let mut tx = repo.begin_transaction().await.unwrap();
        let record = tx.insert(&sample()).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(repo.find_by_id(record.id).await.unwrap(), None);
        assert!(repo.count_by_job_type().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;

        let mut tx = repo.begin_transaction().await.unwrap();
        let mut record = tx.insert(&sample()).await.unwrap();
        tx.commit().await.unwrap();

        record.apply(JobPatch {
            location: Some("Remote".to_string()),
            tags: Some(vec![]),
            ..Default::default()
        });
        // stored at millisecond precision
        record.touch(Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap());

        let mut tx = repo.begin_transaction().await.unwrap();
        tx.update(&record).await.unwrap();
        tx.commit().await.unwrap();

        let stored = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert!(stored.tags.is_empty());

        let mut tx = repo.begin_transaction().await.unwrap();
        assert!(tx.delete(record.id).await.unwrap());
        assert!(!tx.delete(record.id).await.unwrap());
        tx.commit().await.unwrap();

        assert_eq!(repo.find_by_id(record.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let repo = setup().await;
        let ghost = sample().with_id(77);

        let mut tx = repo.begin_transaction().await.unwrap();
        let err = tx.update(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let repo = setup().await;

        let mut tx = repo.begin_transaction().await.unwrap();
        let first = tx.insert(&sample()).await.unwrap();
        let second = tx.insert(&sample()).await.unwrap();
        assert!(tx.delete(second.id).await.unwrap());
        let third = tx.insert(&sample()).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!((first.id, second.id, third.id), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_check_constraint_backstops_validation() {
        let repo = setup().await;
        let mut invalid = sample();
        invalid.title = String::new();

        let mut tx = repo.begin_transaction().await.unwrap();
        let err = tx.insert(&invalid).await.unwrap_err();
        assert!(err.to_string().contains("Check constraint violation"), "{}", err);
    }
}
