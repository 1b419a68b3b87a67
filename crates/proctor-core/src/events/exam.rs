//! Exam session domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::{SessionId, StudentId, TestId};
use crate::types::session::TerminationReason;
use crate::types::violation::{Severity, ViolationSource};

/// Events related to exam sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExamEvent {
    /// A session was created for a student.
    Created {
        /// The session ID.
        session_id: SessionId,
        /// The test being taken.
        test_id: TestId,
        /// The student taking it.
        student_id: StudentId,
    },
    /// Capability granted and the countdown started.
    Started {
        /// The session ID.
        session_id: SessionId,
        /// Allotted time.
        duration_seconds: u64,
    },
    /// A violation was appended to the session log.
    ViolationRecorded {
        /// The session ID.
        session_id: SessionId,
        /// Producer of the signal.
        source: ViolationSource,
        /// Display severity.
        severity: Severity,
        /// Count after this violation.
        count: u32,
    },
    /// The session was submitted, by the student or on time expiry.
    Submitted {
        /// The session ID.
        session_id: SessionId,
        /// Whether the countdown forced the submission.
        time_expired: bool,
    },
    /// The session was forcibly ended.
    Terminated {
        /// The session ID.
        session_id: SessionId,
        /// Why it ended.
        reason: TerminationReason,
    },
    /// The final result was acknowledged by the submission collaborator.
    ResultAcknowledged {
        /// The session ID.
        session_id: SessionId,
        /// Collaborator reference.
        reference: String,
    },
    /// Handing over the final result failed.
    ResultFailed {
        /// The session ID.
        session_id: SessionId,
        /// Failure description.
        error: String,
    },
}

impl ExamEvent {
    /// The session the event belongs to.
    pub fn session_id(&self) -> SessionId {
        match self {
            Self::Created { session_id, .. }
            | Self::Started { session_id, .. }
            | Self::ViolationRecorded { session_id, .. }
            | Self::Submitted { session_id, .. }
            | Self::Terminated { session_id, .. }
            | Self::ResultAcknowledged { session_id, .. }
            | Self::ResultFailed { session_id, .. } => *session_id,
        }
    }

    /// Whether the event marks the session reaching a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted { .. } | Self::Terminated { .. })
    }
}
