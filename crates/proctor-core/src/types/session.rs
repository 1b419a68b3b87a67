//! Exam session status vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an exam session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created, capability not yet granted.
    NotStarted,
    /// Timer running and monitors active.
    Running,
    /// Ended by force; see [`TerminationReason`].
    Terminated,
    /// Submitted by the student or on time expiry.
    SubmittedNormally,
}

impl SessionStatus {
    /// Check if the session is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::SubmittedNormally)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Terminated => "terminated",
            Self::SubmittedNormally => "submitted_normally",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session reached `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Camera/microphone could not be acquired at start.
    DeviceUnavailable,
    /// The violation threshold was reached.
    PolicyViolation,
    /// The student navigated away or closed the exam.
    UserAbandoned,
    /// A proctor ended the exam manually.
    Administrative,
}

impl TerminationReason {
    /// Return the reason as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceUnavailable => "device_unavailable",
            Self::PolicyViolation => "policy_violation",
            Self::UserAbandoned => "user_abandoned",
            Self::Administrative => "administrative",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
