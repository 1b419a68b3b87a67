//! Exam session state machine.
//!
//! `NotStarted -> Running -> {Terminated | SubmittedNormally}`. Terminal
//! states are immutable: every mutating operation on a terminal session
//! is rejected and leaves the session untouched. A session ended by the
//! three-strikes rule rejects with `PolicyViolation`, any other terminal
//! session with `InvalidState`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use proctor_core::error::AppError;
use proctor_core::traits::SubmissionPayload;
use proctor_core::types::{
    QuestionId, SessionId, SessionStatus, Severity, StudentId, TerminationReason, TestId,
    ViolationEntry, ViolationSource,
};

use super::answers::AnswerSheet;

/// Accepted violations that terminate a session.
pub const VIOLATION_THRESHOLD: u32 = 3;

/// Status change caused by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session is still running.
    Continue,
    /// The session reached `SubmittedNormally`.
    Submitted {
        /// Whether the countdown forced the submission.
        time_expired: bool,
    },
    /// The session reached `Terminated`.
    Terminated(TerminationReason),
}

impl Transition {
    /// Whether this transition ended the session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Result of a countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Seconds left after the tick.
    pub remaining_seconds: u64,
    /// Status change caused by the tick.
    pub transition: Transition,
}

/// Result of an accepted violation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationOutcome {
    /// The log entry that was appended.
    pub entry: ViolationEntry,
    /// Violation count after the report.
    pub count: u32,
    /// Status change caused by the report.
    pub transition: Transition,
}

/// A timed, proctored attempt at a test.
#[derive(Debug, Clone, Serialize)]
pub struct ExamSession {
    id: SessionId,
    test_id: TestId,
    student_id: StudentId,
    duration_seconds: u64,
    remaining_seconds: u64,
    violation_count: u32,
    violation_log: Vec<ViolationEntry>,
    status: SessionStatus,
    termination_reason: Option<TerminationReason>,
    monitoring_sources: BTreeSet<ViolationSource>,
    answers: AnswerSheet,
    #[serde(skip)]
    question_ids: BTreeSet<QuestionId>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl ExamSession {
    /// Create a session in `NotStarted`.
    ///
    /// `question_ids` restricts which questions may be answered.
    pub fn new(
        test_id: TestId,
        student_id: StudentId,
        duration_seconds: u64,
        question_ids: impl IntoIterator<Item = QuestionId>,
    ) -> Result<Self, AppError> {
        if duration_seconds == 0 {
            return Err(AppError::validation("Session duration must be positive"));
        }

        Ok(Self {
            id: SessionId::new(),
            test_id,
            student_id,
            duration_seconds,
            remaining_seconds: duration_seconds,
            violation_count: 0,
            violation_log: Vec::new(),
            status: SessionStatus::NotStarted,
            termination_reason: None,
            monitoring_sources: BTreeSet::new(),
            answers: AnswerSheet::default(),
            question_ids: question_ids.into_iter().collect(),
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        })
    }

    // -- Accessors --

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Test being taken.
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    /// Student taking the test.
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    /// Total allotted time.
    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// Time left on the countdown.
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Accepted violations so far.
    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    /// Count at which the session terminates.
    pub fn violation_threshold(&self) -> u32 {
        VIOLATION_THRESHOLD
    }

    /// Ordered violation log.
    pub fn violation_log(&self) -> &[ViolationEntry] {
        &self.violation_log
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Set iff the status is `Terminated`.
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination_reason
    }

    /// Sources activated at start.
    pub fn monitoring_sources(&self) -> &BTreeSet<ViolationSource> {
        &self.monitoring_sources
    }

    /// Current answers.
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// When the countdown started.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When a terminal status was reached.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Whether the session is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    // -- Transitions --

    /// `NotStarted -> Running` once the capability has been granted.
    pub fn start(
        &mut self,
        sources: impl IntoIterator<Item = ViolationSource>,
    ) -> Result<(), AppError> {
        self.ensure_status(SessionStatus::NotStarted, "start")?;
        self.status = SessionStatus::Running;
        self.remaining_seconds = self.duration_seconds;
        self.monitoring_sources = sources.into_iter().collect();
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// `NotStarted -> Terminated(DeviceUnavailable)` when the grant failed.
    pub fn fail_start(&mut self) -> Result<Transition, AppError> {
        self.ensure_status(SessionStatus::NotStarted, "start")?;
        Ok(self.end(TerminationReason::DeviceUnavailable))
    }

    /// Decrement the countdown, floored at zero. Reaching zero submits.
    pub fn tick(&mut self, elapsed_seconds: u64) -> Result<TickOutcome, AppError> {
        self.ensure_status(SessionStatus::Running, "tick")?;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(elapsed_seconds);

        let transition = if self.remaining_seconds == 0 {
            self.finish_submission(true)
        } else {
            Transition::Continue
        };

        Ok(TickOutcome {
            remaining_seconds: self.remaining_seconds,
            transition,
        })
    }

    /// Append a violation; terminate once the count reaches the threshold.
    pub fn report_violation(
        &mut self,
        source: ViolationSource,
        severity: Severity,
        details: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Result<ViolationOutcome, AppError> {
        self.ensure_status(SessionStatus::Running, "report a violation")?;

        self.violation_count += 1;
        let entry = ViolationEntry {
            sequence: self.violation_count,
            source,
            severity,
            timestamp: observed_at,
            details: details.into(),
        };
        self.violation_log.push(entry.clone());

        let transition = if self.violation_count >= VIOLATION_THRESHOLD {
            self.end(TerminationReason::PolicyViolation)
        } else {
            Transition::Continue
        };

        Ok(ViolationOutcome {
            entry,
            count: self.violation_count,
            transition,
        })
    }

    /// `Running -> SubmittedNormally` on the student's request.
    pub fn submit(&mut self) -> Result<Transition, AppError> {
        self.ensure_status(SessionStatus::Running, "submit")?;
        Ok(self.finish_submission(false))
    }

    /// `Running -> Terminated(reason)`.
    pub fn terminate(&mut self, reason: TerminationReason) -> Result<Transition, AppError> {
        self.ensure_status(SessionStatus::Running, "terminate")?;
        Ok(self.end(reason))
    }

    /// Implicit `terminate(UserAbandoned)` when the exam page goes away.
    ///
    /// Unlike [`ExamSession::terminate`] this also closes a session that
    /// never started, so that every created session ends in a terminal state.
    pub fn abandon(&mut self) -> Result<Transition, AppError> {
        match self.status {
            SessionStatus::NotStarted | SessionStatus::Running => {
                Ok(self.end(TerminationReason::UserAbandoned))
            }
            _ => Err(self.rejection("abandon")),
        }
    }

    /// Record or replace the answer to a question.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        answer: impl Into<String>,
    ) -> Result<Option<String>, AppError> {
        self.ensure_status(SessionStatus::Running, "answer")?;
        if !self.question_ids.is_empty() && !self.question_ids.contains(&question_id) {
            return Err(AppError::validation(format!(
                "Question '{question_id}' is not part of test '{}'",
                self.test_id
            )));
        }
        Ok(self.answers.record(question_id, answer.into()))
    }

    /// Build the payload handed to the submission collaborator.
    ///
    /// Returns `None` until the session is terminal.
    pub fn submission_payload(&self) -> Option<SubmissionPayload> {
        let ended_at = self.ended_at?;
        Some(SubmissionPayload {
            session_id: self.id,
            test_id: self.test_id.clone(),
            student_id: self.student_id.clone(),
            status: self.status,
            termination_reason: self.termination_reason,
            answers: self.answers.to_map(),
            violations: self.violation_log.clone(),
            ended_at,
        })
    }

    fn finish_submission(&mut self, time_expired: bool) -> Transition {
        self.status = SessionStatus::SubmittedNormally;
        self.ended_at = Some(Utc::now());
        Transition::Submitted { time_expired }
    }

    fn end(&mut self, reason: TerminationReason) -> Transition {
        self.status = SessionStatus::Terminated;
        self.termination_reason = Some(reason);
        self.ended_at = Some(Utc::now());
        Transition::Terminated(reason)
    }

    /// Error returned when `action` is not accepted in the current status.
    pub fn rejection(&self, action: &str) -> AppError {
        if self.termination_reason == Some(TerminationReason::PolicyViolation) {
            AppError::policy_violation(format!(
                "Cannot {action}: the session was terminated after {VIOLATION_THRESHOLD} violations"
            ))
        } else {
            AppError::invalid_state(format!(
                "Cannot {action} while the session is {}",
                self.status
            ))
        }
    }

    fn ensure_status(&self, expected: SessionStatus, action: &str) -> Result<(), AppError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(self.rejection(action))
        }
    }
}
