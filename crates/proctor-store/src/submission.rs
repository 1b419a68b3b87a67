//! In-process submission collaborator.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{info, warn};

use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_core::traits::{SubmissionPayload, SubmissionReceipt, SubmissionService};
use proctor_core::types::SessionId;

/// Accepts submission payloads and keeps them for the process lifetime.
///
/// Availability can be toggled to exercise the retry path.
#[derive(Debug)]
pub struct SubmissionLedger {
    entries: DashMap<SessionId, (SubmissionPayload, SubmissionReceipt)>,
    available: AtomicBool,
    sequence: AtomicU64,
}

impl Default for SubmissionLedger {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            available: AtomicBool::new(true),
            sequence: AtomicU64::new(1),
        }
    }
}

impl SubmissionLedger {
    /// Create an empty, available ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent submissions succeed or fail.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Payload accepted for a session.
    pub fn get(&self, session_id: &SessionId) -> Option<SubmissionPayload> {
        self.entries.get(session_id).map(|e| e.value().0.clone())
    }

    /// Number of accepted submissions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SubmissionService for SubmissionLedger {
    async fn submit(&self, payload: &SubmissionPayload) -> AppResult<SubmissionReceipt> {
        if !self.available.load(Ordering::Acquire) {
            warn!(session_id = %payload.session_id, "Submission ledger unavailable");
            return Err(AppError::submission_failure(
                "Submission service is unavailable",
            ));
        }

        if let Some(existing) = self.entries.get(&payload.session_id) {
            return Ok(existing.value().1.clone());
        }

        let seq = self.sequence.fetch_add(1, Ordering::AcqRel);
        let receipt = SubmissionReceipt {
            reference: format!("SUB-{seq:06}"),
            accepted_at: Utc::now(),
        };
        self.entries
            .insert(payload.session_id, (payload.clone(), receipt.clone()));

        info!(
            session_id = %payload.session_id,
            test_id = %payload.test_id,
            status = %payload.status,
            violations = payload.violations.len(),
            reference = %receipt.reference,
            "Submission accepted"
        );
        Ok(receipt)
    }
}
