// * Job Store
// * External job-tracking collaborator. The orchestrator reports coarse progress at
// * stage boundaries and a terminal outcome; nothing else writes job records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::error::ExtractionError;
use crate::persistence::schema::{ExtractedData, Gap};

/// Job lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Persisted view of one contract's processing job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub contract_id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub extracted_data: Option<ExtractedData>,
    pub score: Option<f64>,
    pub gaps: Option<Vec<Gap>>,
    pub error: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn pending(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            status: JobStatus::Pending,
            progress: 0,
            extracted_data: None,
            score: None,
            gaps: None,
            error: None,
            processed_at: None,
        }
    }

    /// Folds an update into the record; absent fields keep their value
    pub fn apply(&mut self, update: JobUpdate) {
        self.status = update.status;
        self.progress = update.progress;
        if update.extracted_data.is_some() {
            self.extracted_data = update.extracted_data;
        }
        if update.score.is_some() {
            self.score = update.score;
        }
        if update.gaps.is_some() {
            self.gaps = update.gaps;
        }
        if update.error.is_some() {
            self.error = update.error;
        }
        if update.processed_at.is_some() {
            self.processed_at = update.processed_at;
        }
    }

    /// Converts to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A status/progress change, optionally carrying results
#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdate {
    pub status: JobStatus,
    pub progress: u8,
    pub extracted_data: Option<ExtractedData>,
    pub score: Option<f64>,
    pub gaps: Option<Vec<Gap>>,
    pub error: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    /// Milestone reached while processing
    pub fn progress(progress: u8) -> Self {
        Self {
            status: JobStatus::Processing,
            progress,
            extracted_data: None,
            score: None,
            gaps: None,
            error: None,
            processed_at: None,
        }
    }

    pub fn completed(data: ExtractedData, score: f64, gaps: Vec<Gap>) -> Self {
        Self {
            status: JobStatus::Completed,
            progress: crate::config::constants::PROGRESS_COMPLETE,
            extracted_data: Some(data),
            score: Some(score),
            gaps: Some(gaps),
            error: None,
            processed_at: Some(Utc::now()),
        }
    }

    /// Terminal failure; progress stays at the last milestone reached
    pub fn failed(progress: u8, error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            progress,
            extracted_data: None,
            score: None,
            gaps: None,
            error: Some(error.into()),
            processed_at: Some(Utc::now()),
        }
    }
}

/// Type alias for async store results
pub type StoreResult<T> = Pin<Box<dyn Future<Output = Result<T, ExtractionError>> + Send>>;

/// Trait for the job-tracking collaborator
pub trait JobStore: Send + Sync {
    /// Applies an update to a job
    fn update(&self, contract_id: &str, update: JobUpdate) -> StoreResult<()>;

    /// Fetches the current record for a job
    fn get(&self, contract_id: &str) -> StoreResult<Option<JobRecord>>;
}

/// In-memory job store for tests and the CLI
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending job
    pub fn create(&self, contract_id: &str) -> Result<JobRecord, ExtractionError> {
        let record = JobRecord::pending(contract_id);
        let mut jobs = self.jobs.write().map_err(lock_error)?;
        jobs.insert(contract_id.to_string(), record.clone());
        Ok(record)
    }

    pub fn count(&self) -> usize {
        self.jobs.read().map(|jobs| jobs.len()).unwrap_or(0)
    }

    fn apply(&self, contract_id: &str, update: JobUpdate) -> Result<(), ExtractionError> {
        let mut jobs = self.jobs.write().map_err(lock_error)?;
        // * Unknown ids are registered on first update
        jobs.entry(contract_id.to_string())
            .or_insert_with(|| JobRecord::pending(contract_id))
            .apply(update);
        Ok(())
    }

    fn lookup(&self, contract_id: &str) -> Result<Option<JobRecord>, ExtractionError> {
        let jobs = self.jobs.read().map_err(lock_error)?;
        Ok(jobs.get(contract_id).cloned())
    }
}

fn lock_error<T>(_: std::sync::PoisonError<T>) -> ExtractionError {
    ExtractionError::JobStore("job store lock poisoned".to_string())
}

impl JobStore for InMemoryJobStore {
    fn update(&self, contract_id: &str, update: JobUpdate) -> StoreResult<()> {
        let result = self.apply(contract_id, update);
        Box::pin(async move { result })
    }

    fn get(&self, contract_id: &str) -> StoreResult<Option<JobRecord>> {
        let result = self.lookup(contract_id);
        Box::pin(async move { result })
    }
}

// * Implement the trait for Arc<InMemoryJobStore> to support shared ownership
impl JobStore for Arc<InMemoryJobStore> {
    fn update(&self, contract_id: &str, update: JobUpdate) -> StoreResult<()> {
        (**self).update(contract_id, update)
    }

    fn get(&self, contract_id: &str) -> StoreResult<Option<JobRecord>> {
        (**self).get(contract_id)
    }
}
