//! Filtering and grouping of stored violations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use proctor_core::types::{Severity, StudentId, TestId};

use super::model::ViolationRecord;

/// Optional filters applied to a violation query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationFilter {
    /// Only violations of this test.
    pub test_id: Option<TestId>,
    /// Only violations of this student.
    pub student_id: Option<StudentId>,
}

impl ViolationFilter {
    /// Whether a record passes the filter.
    pub fn matches(&self, record: &ViolationRecord) -> bool {
        self.test_id.as_ref().is_none_or(|t| *t == record.test_id)
            && self
                .student_id
                .as_ref()
                .is_none_or(|s| *s == record.student_id)
    }
}

/// Count of violations per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// High severity.
    pub high: u64,
    /// Medium severity.
    pub medium: u64,
    /// Low severity.
    pub low: u64,
}

impl SeverityCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// Result of a violation query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationSummary {
    /// Number of matching violations.
    pub total: u64,
    /// Matching violations per type.
    pub by_type: BTreeMap<String, u64>,
    /// Matching violations per severity.
    pub by_severity: SeverityCounts,
    /// The matching violations in insertion order.
    pub violations: Vec<ViolationRecord>,
}

impl ViolationSummary {
    /// Group an already-filtered list of violations.
    pub fn summarize(violations: Vec<ViolationRecord>) -> Self {
        let mut by_type = BTreeMap::new();
        let mut by_severity = SeverityCounts::default();
        for v in &violations {
            *by_type.entry(v.kind.clone()).or_insert(0) += 1;
            by_severity.add(v.severity);
        }

        Self {
            total: violations.len() as u64,
            by_type,
            by_severity,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: u64, test: &str, student: &str, kind: &str, severity: Severity) -> ViolationRecord {
        ViolationRecord {
            id,
            test_id: TestId::new(test),
            student_id: StudentId::new(student),
            kind: kind.to_string(),
            severity,
            timestamp: Utc::now(),
            details: String::new(),
            frame_data: None,
        }
    }

    #[test]
    fn test_filter_matches() {
        let r = record(0, "1", "s1", "tab_visibility", Severity::Medium);
        assert!(ViolationFilter::default().matches(&r));
        assert!(ViolationFilter {
            test_id: Some(TestId::new("1")),
            student_id: None,
        }
        .matches(&r));
        assert!(!ViolationFilter {
            test_id: Some(TestId::new("1")),
            student_id: Some(StudentId::new("s2")),
        }
        .matches(&r));
    }

    #[test]
    fn test_summarize_groups_by_type_and_severity() {
        let summary = ViolationSummary::summarize(vec![
            record(0, "1", "s1", "tab_visibility", Severity::Medium),
            record(1, "1", "s1", "tab_visibility", Severity::Medium),
            record(2, "1", "s2", "multiple_faces", Severity::High),
        ]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_type.get("tab_visibility"), Some(&2));
        assert_eq!(summary.by_type.get("multiple_faces"), Some(&1));
        assert_eq!(
            summary.by_severity,
            SeverityCounts {
                high: 1,
                medium: 2,
                low: 0
            }
        );

        let json = serde_json::to_value(&summary).expect("json");
        assert_eq!(json["byType"]["tab_visibility"], 2);
        assert_eq!(json["bySeverity"]["high"], 1);
    }
}
