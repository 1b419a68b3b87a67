//! Submission collaborator.

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::id::{QuestionId, SessionId, StudentId, TestId};
use crate::types::session::{SessionStatus, TerminationReason};
use crate::types::violation::ViolationEntry;

/// Final result of a session handed over for grading and review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Session being submitted.
    pub session_id: SessionId,
    /// Test taken.
    pub test_id: TestId,
    /// Student who took it.
    pub student_id: StudentId,
    /// Terminal status reached.
    pub status: SessionStatus,
    /// Set when `status` is `Terminated`.
    pub termination_reason: Option<TerminationReason>,
    /// Final answer set.
    pub answers: BTreeMap<QuestionId, String>,
    /// Read-only violation log.
    pub violations: Vec<ViolationEntry>,
    /// When the session ended.
    pub ended_at: DateTime<Utc>,
}

/// Acknowledgement returned by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Collaborator-assigned reference.
    pub reference: String,
    /// When the submission was accepted.
    pub accepted_at: DateTime<Utc>,
}

/// Accepts final answers plus violation log and returns an acknowledgement.
///
/// Failures are reported as
/// [`crate::error::ErrorKind::SubmissionFailure`]. Only the submission call
/// may be retried; the exam itself never is.
#[async_trait]
pub trait SubmissionService: Send + Sync + Debug + 'static {
    /// Submit a final result.
    async fn submit(&self, payload: &SubmissionPayload) -> AppResult<SubmissionReceipt>;
}
