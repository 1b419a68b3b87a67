//! Violation record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::error::AppError;
use proctor_core::types::{Severity, StudentId, TestId, ViolationEntry};

/// A violation as stored by the violation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    /// Insertion index within the store.
    pub id: u64,
    /// Test the violation belongs to.
    pub test_id: TestId,
    /// Student who caused it.
    pub student_id: StudentId,
    /// Free-form violation type, e.g. `tab_visibility` or `multiple_faces`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Severity.
    pub severity: Severity,
    /// Server-side time of recording.
    pub timestamp: DateTime<Utc>,
    /// Human-readable details.
    #[serde(default)]
    pub details: String,
    /// Optional captured frame, base64 encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_data: Option<String>,
}

/// Input for recording a violation.
///
/// Required fields are optional here so that their absence can be
/// reported as a validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewViolation {
    /// Test the violation belongs to.
    pub test_id: Option<TestId>,
    /// Student who caused it.
    pub student_id: Option<StudentId>,
    /// Violation type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Severity; defaults to medium.
    pub severity: Option<Severity>,
    /// Human-readable details.
    pub details: Option<String>,
    /// Optional captured frame.
    pub frame_data: Option<String>,
}

impl NewViolation {
    /// Build the store input for an entry of a live session.
    pub fn from_entry(test_id: &TestId, student_id: &StudentId, entry: &ViolationEntry) -> Self {
        Self {
            test_id: Some(test_id.clone()),
            student_id: Some(student_id.clone()),
            kind: Some(entry.source.as_str().to_string()),
            severity: Some(entry.severity),
            details: Some(entry.details.clone()),
            frame_data: None,
        }
    }

    /// Turn the input into a record with the given id and timestamp.
    pub fn into_record(self, id: u64, timestamp: DateTime<Utc>) -> Result<ViolationRecord, AppError> {
        let test_id = self
            .test_id
            .filter(|t| !t.is_blank())
            .ok_or_else(|| AppError::validation("Missing required fields: testId"))?;
        let student_id = self
            .student_id
            .filter(|s| !s.is_blank())
            .ok_or_else(|| AppError::validation("Missing required fields: studentId"))?;
        let kind = self
            .kind
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::validation("Missing required fields: type"))?;

        Ok(ViolationRecord {
            id,
            test_id,
            student_id,
            kind,
            severity: self.severity.unwrap_or(Severity::Medium),
            timestamp,
            details: self.details.unwrap_or_default(),
            frame_data: self.frame_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_core::error::ErrorKind;

    #[test]
    fn test_into_record_requires_fields() {
        let missing_type = NewViolation {
            test_id: Some(TestId::new("1")),
            student_id: Some(StudentId::new("s1")),
            ..Default::default()
        };
        let err = missing_type
            .into_record(0, Utc::now())
            .expect_err("type missing");
        assert_eq!(err.kind, ErrorKind::Validation);

        let blank_test = NewViolation {
            test_id: Some(TestId::new("  ")),
            student_id: Some(StudentId::new("s1")),
            kind: Some("tab_visibility".into()),
            ..Default::default()
        };
        assert!(blank_test.into_record(0, Utc::now()).is_err());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = NewViolation {
            test_id: Some(TestId::new("1")),
            student_id: Some(StudentId::new("s1")),
            kind: Some("phone_presence".into()),
            severity: Some(Severity::High),
            details: Some("phone in frame".into()),
            frame_data: None,
        }
        .into_record(4, Utc::now())
        .expect("record");

        let json = serde_json::to_value(&record).expect("json");
        assert_eq!(json["testId"], "1");
        assert_eq!(json["studentId"], "s1");
        assert_eq!(json["type"], "phone_presence");
        assert_eq!(json["severity"], "high");
        assert!(json.get("frameData").is_none());
    }
}
