//! Violation store trait and its in-memory implementation.

pub mod memory;

use std::fmt::Debug;

use async_trait::async_trait;

use proctor_core::result::AppResult;
use proctor_entity::violation::{NewViolation, ViolationFilter, ViolationRecord, ViolationSummary};

pub use memory::InMemoryViolationStore;

/// Persists violation records for the lifetime of the store.
#[async_trait]
pub trait ViolationStore: Send + Sync + Debug + 'static {
    /// Validate and append a violation; the store assigns id and timestamp.
    async fn record(&self, violation: NewViolation) -> AppResult<ViolationRecord>;

    /// Return matching violations grouped by type and severity.
    async fn query(&self, filter: &ViolationFilter) -> AppResult<ViolationSummary>;

    /// Stop accepting writes. Reads and writes after close fail.
    async fn close(&self) -> AppResult<()>;
}
