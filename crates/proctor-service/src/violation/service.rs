//! Violation service over the violation store.

use std::sync::Arc;

use tracing::info;

use proctor_core::result::AppResult;
use proctor_entity::violation::{NewViolation, ViolationFilter, ViolationRecord, ViolationSummary};
use proctor_store::ViolationStore;

/// Records client-reported violations and answers admin queries.
#[derive(Debug, Clone)]
pub struct ViolationService {
    store: Arc<dyn ViolationStore>,
}

impl ViolationService {
    /// Creates a new violation service.
    pub fn new(store: Arc<dyn ViolationStore>) -> Self {
        Self { store }
    }

    /// Record a violation; test, student, and type are required.
    pub async fn record(&self, violation: NewViolation) -> AppResult<ViolationRecord> {
        let record = self.store.record(violation).await?;
        info!(
            violation_id = record.id,
            test_id = %record.test_id,
            student_id = %record.student_id,
            kind = %record.kind,
            severity = %record.severity,
            "Violation recorded"
        );
        Ok(record)
    }

    /// Violations matching the filter, grouped by type and severity.
    pub async fn summary(&self, filter: &ViolationFilter) -> AppResult<ViolationSummary> {
        self.store.query(filter).await
    }
}
