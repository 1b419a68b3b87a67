//! Per-test analytics.

use serde::{Deserialize, Serialize};

use proctor_core::types::{SessionStatus, TerminationReason, TestId};

use crate::violation::ViolationSummary;

/// Sessions of a test grouped by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcomeCounts {
    /// Sessions not yet terminal.
    pub active: u64,
    /// Submitted by the student or by the countdown.
    pub submitted: u64,
    /// Terminated by the three-strikes policy.
    pub terminated_policy_violation: u64,
    /// Terminated because the camera or microphone was unavailable.
    pub terminated_device_unavailable: u64,
    /// Abandoned by the student.
    pub abandoned: u64,
    /// Terminated by an administrator.
    pub terminated_administrative: u64,
}

impl SessionOutcomeCounts {
    /// Count one session in the bucket for its status.
    pub fn add(&mut self, status: SessionStatus, reason: Option<TerminationReason>) {
        match (status, reason) {
            (SessionStatus::SubmittedNormally, _) => self.submitted += 1,
            (SessionStatus::Terminated, Some(TerminationReason::PolicyViolation)) => {
                self.terminated_policy_violation += 1
            }
            (SessionStatus::Terminated, Some(TerminationReason::DeviceUnavailable)) => {
                self.terminated_device_unavailable += 1
            }
            (SessionStatus::Terminated, Some(TerminationReason::UserAbandoned)) => {
                self.abandoned += 1
            }
            (SessionStatus::Terminated, _) => self.terminated_administrative += 1,
            (SessionStatus::NotStarted | SessionStatus::Running, _) => self.active += 1,
        }
    }

    /// Total sessions counted.
    pub fn total(&self) -> u64 {
        self.active
            + self.submitted
            + self.terminated_policy_violation
            + self.terminated_device_unavailable
            + self.abandoned
            + self.terminated_administrative
    }
}

/// Analytics for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestAnalytics {
    /// Test analysed.
    pub test_id: TestId,
    /// Sessions by outcome.
    pub sessions: SessionOutcomeCounts,
    /// Violations recorded for the test.
    pub violations: ViolationSummary,
}
