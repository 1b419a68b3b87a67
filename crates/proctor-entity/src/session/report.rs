//! Read-only view of a session and the hand-over of its result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::model::ExamSession;

/// Progress of handing a terminal session to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    /// The session has not reached a terminal status yet.
    NotSubmitted,
    /// The hand-over is in flight.
    Pending,
    /// The collaborator acknowledged the result.
    Acknowledged {
        /// Collaborator reference.
        reference: String,
        /// When it was accepted.
        accepted_at: DateTime<Utc>,
    },
    /// Every attempt so far failed; the submission may be retried.
    Failed {
        /// Last failure message.
        error: String,
        /// Attempts made so far.
        attempts: u32,
    },
}

impl SubmissionState {
    /// Whether a retry of the submission call is permitted.
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Failed { attempts, .. } => *attempts,
            _ => 0,
        }
    }
}

/// Snapshot of a session plus the state of its result hand-over.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Session snapshot.
    pub session: ExamSession,
    /// Result hand-over.
    pub submission: SubmissionState,
}

impl SessionReport {
    /// Report for a session that is still live.
    pub fn live(session: ExamSession) -> Self {
        Self {
            session,
            submission: SubmissionState::NotSubmitted,
        }
    }
}
