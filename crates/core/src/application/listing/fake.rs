// In-memory test doubles for the repository ports

use crate::domain::{JobId, JobQuery, JobRecord, UnsavedJob};
use crate::error::{AppError, Result};
use crate::port::{
    JobRepository, JobRepositoryTransaction, TimeProvider, Transaction, TransactionalJobRepository,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Clock that advances 1ms per reading
pub struct FakeClock(AtomicI64);

impl FakeClock {
    pub fn new(start_millis: i64) -> Self {
        Self(AtomicI64::new(start_millis))
    }
}

impl TimeProvider for FakeClock {
    fn now_millis(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
struct State {
    jobs: BTreeMap<JobId, JobRecord>,
    last_id: JobId,
}

/// Snapshot-isolated store: a transaction works on a copy that replaces the
/// shared state on commit.
#[derive(Default)]
pub struct InMemoryJobRepository {
    state: Arc<Mutex<State>>,
    fail_writes: AtomicBool,
    rollbacks: Arc<AtomicUsize>,
}

impl InMemoryJobRepository {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn find_by_id(&self, id: JobId) -> Result<Option<JobRecord>> {
        Ok(self.state.lock().unwrap().jobs.get(&id).cloned())
    }

    async fn list(&self, query: &JobQuery) -> Result<Vec<JobRecord>> {
        let state = self.state.lock().unwrap();
        let mut jobs: Vec<JobRecord> = state
            .jobs
            .values()
            .filter(|job| query.filter.matches(job))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| query.sort.compare(a, b));
        Ok(jobs)
    }

    async fn count_by_job_type(&self) -> Result<BTreeMap<String, i64>> {
        let state = self.state.lock().unwrap();
        let mut counts = BTreeMap::new();
        for job in state.jobs.values() {
            *counts.entry(job.job_type.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl TransactionalJobRepository for InMemoryJobRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn JobRepositoryTransaction>> {
        let staged = self.state.lock().unwrap().clone();
        Ok(Box::new(InMemoryTransaction {
            staged,
            shared: Arc::clone(&self.state),
            fail_writes: self.fail_writes.load(Ordering::SeqCst),
            rollbacks: Arc::clone(&self.rollbacks),
        }))
    }
}

struct InMemoryTransaction {
    staged: State,
    shared: Arc<Mutex<State>>,
    fail_writes: bool,
    rollbacks: Arc<AtomicUsize>,
}

impl InMemoryTransaction {
    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::Database("disk I/O error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        *self.shared.lock().unwrap() = self.staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl JobRepositoryTransaction for InMemoryTransaction {
    async fn insert(&mut self, job: &UnsavedJob) -> Result<JobRecord> {
        self.check_writable()?;
        self.staged.last_id += 1;
        let record = job.clone().with_id(self.staged.last_id);
        self.staged.jobs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&mut self, id: JobId) -> Result<Option<JobRecord>> {
        Ok(self.staged.jobs.get(&id).cloned())
    }

    async fn update(&mut self, job: &JobRecord) -> Result<()> {
        self.check_writable()?;
        self.staged.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn delete(&mut self, id: JobId) -> Result<bool> {
        self.check_writable()?;
        Ok(self.staged.jobs.remove(&id).is_some())
    }
}
