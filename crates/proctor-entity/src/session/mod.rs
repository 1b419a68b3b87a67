//! Exam session domain entities.

pub mod answers;
pub mod model;
pub mod report;

pub use answers::AnswerSheet;
pub use model::{ExamSession, TickOutcome, Transition, VIOLATION_THRESHOLD, ViolationOutcome};
pub use report::{SessionReport, SubmissionState};
