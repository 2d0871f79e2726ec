// Job Listing Service - the job store's use cases

pub mod create;
pub mod delete;
pub mod update;

#[cfg(test)]
mod fake;

use crate::domain::validation::{parse_new_job, parse_patch};
use crate::domain::{JobId, JobPatch, JobQuery, JobRecord, JobStats, NewJob};
use crate::error::{AppError, Result};
use crate::port::{JobRepository, JobRepositoryTransaction, TimeProvider, TransactionalJobRepository};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Job listing service. Validates input, runs every mutation in its own
/// transaction and serves the read-side queries.
pub struct JobService {
    job_repo: Arc<dyn JobRepository>,
    tx_job_repo: Arc<dyn TransactionalJobRepository>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobService {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        tx_job_repo: Arc<dyn TransactionalJobRepository>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_repo,
            tx_job_repo,
            time_provider,
        }
    }

    /// Validate a raw payload and create the job
    pub async fn create(&self, fields: &Value) -> Result<JobRecord> {
        let job = parse_new_job(fields)?;
        self.create_job(job).await
    }

    /// Create from already validated input
    pub async fn create_job(&self, job: NewJob) -> Result<JobRecord> {
        let created =
            create::execute(self.tx_job_repo.as_ref(), self.time_provider.as_ref(), job).await?;
        info!(job_id = created.id, title = %created.title, "Job created");
        Ok(created)
    }

    pub async fn get(&self, id: JobId) -> Result<JobRecord> {
        self.job_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::job_not_found(id))
    }

    /// Validate a raw partial payload and apply it
    pub async fn update(&self, id: JobId, fields: &Value) -> Result<JobRecord> {
        let patch = parse_patch(fields);
        self.update_parsed(id, patch).await
    }

    /// Apply an already validated patch
    pub async fn update_job(&self, id: JobId, patch: JobPatch) -> Result<JobRecord> {
        self.update_parsed(id, Ok(patch)).await
    }

    /// Apply the outcome of parsing a payload. A failed parse is reported
    /// only after the id is known to exist.
    pub async fn update_parsed(
        &self,
        id: JobId,
        patch: std::result::Result<JobPatch, crate::domain::ValidationErrors>,
    ) -> Result<JobRecord> {
        let updated = update::execute(
            self.tx_job_repo.as_ref(),
            self.time_provider.as_ref(),
            id,
            patch,
        )
        .await?;
        info!(job_id = id, "Job updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: JobId) -> Result<()> {
        delete::execute(self.tx_job_repo.as_ref(), id).await?;
        info!(job_id = id, "Job deleted");
        Ok(())
    }

    pub async fn list(&self, query: &JobQuery) -> Result<Vec<JobRecord>> {
        let jobs = self.job_repo.list(query).await?;
        debug!(
            sort = query.sort.as_str(),
            filtered = !query.filter.is_empty(),
            count = jobs.len(),
            "Listed jobs"
        );
        Ok(jobs)
    }

    pub async fn stats(&self) -> Result<JobStats> {
        // one grouped read, so the total always equals the per-type sum
        let job_types = self.job_repo.count_by_job_type().await?;
        let total_jobs = job_types.values().sum::<i64>();
        Ok(JobStats {
            total_jobs,
            job_types,
        })
    }
}

/// Commit on success, roll back on any error. The original error is what the
/// caller sees even if the rollback itself fails.
async fn finish<T>(tx: Box<dyn JobRepositoryTransaction>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            if let Err(e) = tx.commit().await {
                error!(error = %e, "Commit failed");
                return Err(e);
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, cause = %err, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeClock, InMemoryJobRepository};
    use super::*;
    use crate::domain::{JobFilter, JobType, SortOrder};
    use serde_json::json;

    fn setup() -> (JobService, Arc<InMemoryJobRepository>) {
        let repo = Arc::new(InMemoryJobRepository::default());
        let service = JobService::new(repo.clone(), repo.clone(), Arc::new(FakeClock::new(1_000)));
        (service, repo)
    }

    fn actuarial() -> Value {
        json!({
            "title": "Actuarial Analyst",
            "company": "Acme",
            "location": "NY",
            "job_type": "Full-time",
            "tags": ["life", "pricing"]
        })
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (service, _) = setup();

        let created = service.create(&actuarial()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.tags, ["life", "pricing"]);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.posting_date, created.created_at);

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_ids_never_reused() {
        let (service, _) = setup();

        let first = service.create(&actuarial()).await.unwrap();
        let second = service.create(&actuarial()).await.unwrap();
        service.delete(second.id).await.unwrap();
        let third = service.create(&actuarial()).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_create_validation_error_writes_nothing() {
        let (service, repo) = setup();

        let err = service
            .create(&json!({"title": "", "company": "Acme", "location": "NY", "job_type": "Freelance"}))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                assert!(errors.contains("title"));
                assert!(errors.contains("job_type"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn test_empty_update_only_bumps_updated_at() {
        let (service, _) = setup();
        let created = service.create(&actuarial()).await.unwrap();

        let updated = service.update(created.id, &json!({})).await.unwrap();
        assert!(updated.updated_at > created.updated_at);

        let mut expected = created.clone();
        expected.updated_at = updated.updated_at;
        assert_eq!(updated, expected);
    }

    #[tokio::test]
    async fn test_update_ignores_store_managed_fields() {
        let (service, _) = setup();
        let created = service.create(&actuarial()).await.unwrap();

        let updated = service
            .update(
                created.id,
                &json!({"id": 42, "created_at": "2001-01-01T00:00:00Z", "location": "Remote"}),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.location, "Remote");
        assert_eq!(updated.title, created.title);
    }

    #[tokio::test]
    async fn test_update_validation_error_is_rolled_back() {
        let (service, repo) = setup();
        let created = service.create(&actuarial()).await.unwrap();

        let err = service
            .update(created.id, &json!({"location": "Remote", "title": ""}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.rollbacks(), 1);

        let unchanged = service.get(created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_unknown_id_wins_over_validation() {
        let (service, _) = setup();
        let err = service.update(7, &json!({"title": ""})).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (service, _) = setup();
        let created = service.create(&actuarial()).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(service.delete(created.id).await.unwrap_err().is_not_found());
        assert!(service.get(created.id).await.unwrap_err().is_not_found());
        assert!(service.delete(999).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back() {
        let (service, repo) = setup();
        repo.fail_writes(true);

        let err = service.create(&actuarial()).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(repo.rollbacks(), 1);

        repo.fail_writes(false);
        assert_eq!(service.stats().await.unwrap().total_jobs, 0);
    }

    #[tokio::test]
    async fn test_list_and_stats() {
        let (service, _) = setup();
        service.create(&actuarial()).await.unwrap();
        service
            .create(&json!({
                "title": "Summer Intern",
                "company": "Beta Re",
                "location": "Remote",
                "job_type": "Internship"
            }))
            .await
            .unwrap();

        let internships = service
            .list(&JobQuery::new(
                JobFilter {
                    job_type: Some("Internship".to_string()),
                    ..Default::default()
                },
                SortOrder::default(),
            ))
            .await
            .unwrap();
        assert_eq!(internships.len(), 1);
        assert_eq!(internships[0].job_type, JobType::Internship);

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.job_types.get("Internship"), Some(&1));
        assert_eq!(stats.job_types.get("Full-time"), Some(&1));
        assert_eq!(stats.job_types.get("Contract"), None);
        assert_eq!(stats.total_jobs, stats.job_types.values().sum::<i64>());
    }
}
