//! Response DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::types::{
    QuestionId, SessionId, SessionStatus, StudentId, TerminationReason, TestId, ViolationEntry,
    ViolationSource,
};
use proctor_entity::detection::{Recommendation, RfDetection};
use proctor_entity::session::{SessionReport, SubmissionState};
use proctor_entity::violation::ViolationRecord;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success flag followed by the fields of the payload itself.
///
/// Used by the endpoints whose bodies are not nested under `data`.
#[derive(Debug, Clone, Serialize)]
pub struct Flattened<T: Serialize> {
    /// Always `true`.
    pub success: bool,
    /// Payload fields.
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Flattened<T> {
    /// Creates a successful response.
    pub fn ok(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

/// Result of a face or audio analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse<T: Serialize> {
    /// Always `true`.
    pub success: bool,
    /// The analysis.
    pub analysis: T,
}

/// Result of an RF scan.
#[derive(Debug, Clone, Serialize)]
pub struct RfScanResponse {
    /// Always `true`.
    pub success: bool,
    /// The scan.
    pub detection: RfDetection,
    /// What the proctor should do about it.
    pub recommendation: Recommendation,
}

/// Acknowledgement of a stored violation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordViolationResponse {
    /// Always `true`.
    pub success: bool,
    /// Store id of the new record.
    pub violation_id: u64,
    /// The stored record.
    pub recorded: ViolationRecord,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Live exam sessions.
    pub active_sessions: usize,
}

/// Exam session as seen by clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Session identifier.
    pub session_id: SessionId,
    /// Test being taken.
    pub test_id: TestId,
    /// Student taking it.
    pub student_id: StudentId,
    /// Current status.
    pub status: SessionStatus,
    /// Why the session was terminated.
    pub termination_reason: Option<TerminationReason>,
    /// Total allotted time.
    pub duration_seconds: u64,
    /// Time left.
    pub remaining_seconds: u64,
    /// Accepted violations.
    pub violation_count: u32,
    /// Count at which the session terminates.
    pub violation_threshold: u32,
    /// Ordered violation log.
    pub violations: Vec<ViolationEntry>,
    /// Sources active since start.
    pub monitoring_sources: Vec<ViolationSource>,
    /// Current answers.
    pub answers: BTreeMap<QuestionId, String>,
    /// When the countdown started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the session ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Result hand-over.
    pub submission: SubmissionState,
}

impl From<SessionReport> for SessionResponse {
    fn from(report: SessionReport) -> Self {
        let s = report.session;
        Self {
            session_id: s.id(),
            test_id: s.test_id().clone(),
            student_id: s.student_id().clone(),
            status: s.status(),
            termination_reason: s.termination_reason(),
            duration_seconds: s.duration_seconds(),
            remaining_seconds: s.remaining_seconds(),
            violation_count: s.violation_count(),
            violation_threshold: s.violation_threshold(),
            violations: s.violation_log().to_vec(),
            monitoring_sources: s.monitoring_sources().iter().copied().collect(),
            answers: s.answers().to_map(),
            started_at: s.started_at(),
            ended_at: s.ended_at(),
            submission: report.submission,
        }
    }
}

/// Outcome of a violation report against a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationAckResponse {
    /// Whether a violation was recorded.
    pub recorded: bool,
    /// The appended entry.
    pub entry: Option<ViolationEntry>,
    /// Session after the report.
    pub session: SessionResponse,
}

/// Outcome of a countdown tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickResponse {
    /// Time left after the tick.
    pub remaining_seconds: u64,
    /// Session after the tick.
    pub session: SessionResponse,
}
