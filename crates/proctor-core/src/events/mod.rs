//! Domain events emitted by Proctor Hub operations.
//!
//! Events are published on the session event bus and consumed by the
//! audit logger and by anyone waiting on a session outcome.

pub mod exam;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use exam::ExamEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: ExamEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: ExamEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
