//! In-memory violation store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_entity::violation::{NewViolation, ViolationFilter, ViolationRecord, ViolationSummary};

use super::ViolationStore;

/// Append-only vector of violations guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryViolationStore {
    records: RwLock<Vec<ViolationRecord>>,
    closed: AtomicBool,
}

impl InMemoryViolationStore {
    /// Create an empty, open store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored violations.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(AppError::service_unavailable("Violation store is closed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ViolationStore for InMemoryViolationStore {
    async fn record(&self, violation: NewViolation) -> AppResult<ViolationRecord> {
        self.ensure_open()?;

        let mut records = self.records.write().await;
        let record = violation.into_record(records.len() as u64, Utc::now())?;
        records.push(record.clone());

        debug!(
            violation_id = record.id,
            test_id = %record.test_id,
            student_id = %record.student_id,
            kind = %record.kind,
            severity = %record.severity,
            "Violation stored"
        );
        Ok(record)
    }

    async fn query(&self, filter: &ViolationFilter) -> AppResult<ViolationSummary> {
        self.ensure_open()?;

        let records = self.records.read().await;
        let matching = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(ViolationSummary::summarize(matching))
    }

    async fn close(&self) -> AppResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            let count = self.records.read().await.len();
            info!(count, "Violation store closed");
        }
        Ok(())
    }
}
