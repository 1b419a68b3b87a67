//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use proctor_core::types::Severity;
use proctor_entity::exam::Question;
use proctor_entity::user::UserRole;

/// Login request body. Emptiness is checked by the login service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Requested role.
    #[serde(default)]
    pub role: UserRole,
}

/// Face recognition request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FaceRecognitionRequest {
    /// Base64 frame, optionally a data URL.
    #[serde(default)]
    #[validate(length(min = 1, message = "imageData is required"))]
    pub image_data: String,
    /// Test the frame belongs to.
    #[serde(default)]
    pub test_id: String,
}

/// Audio detection request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AudioDetectionRequest {
    /// Base64 clip.
    #[serde(default)]
    #[validate(length(min = 1, message = "audioData is required"))]
    pub audio_data: String,
    /// Test the clip belongs to.
    #[serde(default)]
    pub test_id: String,
}

/// RF scan request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RfScanRequest {
    /// Test being monitored.
    #[serde(default)]
    #[validate(length(min = 1, message = "testId is required"))]
    pub test_id: String,
    /// Student being monitored.
    #[serde(default)]
    #[validate(length(min = 1, message = "studentId is required"))]
    pub student_id: String,
    /// Optional base64 sweep from the scanner.
    pub signal_data: Option<String>,
}

/// RF history query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfHistoryQuery {
    /// Restrict to one test.
    pub test_id: Option<String>,
}

/// New test for the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRequest {
    /// Test identifier.
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
    /// Display title.
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    /// Subject area.
    #[serde(default)]
    pub subject: String,
    /// Allotted time; the configured default when absent.
    pub duration_seconds: Option<u64>,
    /// Questions.
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Create-session request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Test to take.
    #[serde(default)]
    #[validate(length(min = 1, message = "testId is required"))]
    pub test_id: String,
    /// Student taking it.
    #[serde(default)]
    #[validate(length(min = 1, message = "studentId is required"))]
    pub student_id: String,
}

/// Manual countdown advance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TickRequest {
    /// Seconds elapsed since the previous tick.
    #[validate(range(max = 86400, message = "elapsedSeconds must be at most 86400"))]
    pub elapsed_seconds: u64,
}

/// Violation reported against a live session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportViolationRequest {
    /// Source, e.g. `tab-visibility` or `face_presence`.
    #[serde(default)]
    #[validate(length(min = 1, message = "source is required"))]
    pub source: String,
    /// Severity override.
    pub severity: Option<Severity>,
    /// Human-readable details.
    pub details: Option<String>,
}

/// Page visibility change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityRequest {
    /// Whether the exam page is hidden.
    pub hidden: bool,
}

/// Answer to a question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Question answered.
    #[serde(default)]
    #[validate(length(min = 1, message = "questionId is required"))]
    pub question_id: String,
    /// The answer.
    #[serde(default)]
    pub answer: String,
}

/// Admin termination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminateRequest {
    /// Free-form note.
    pub reason: Option<String>,
}

/// PDF export request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExportPdfRequest {
    /// Test to report on.
    #[serde(default)]
    #[validate(length(min = 1, message = "testId is required"))]
    pub test_id: String,
    /// Report flavour.
    pub report_type: Option<String>,
}
