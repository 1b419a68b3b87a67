//! PDF export metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::types::TestId;

/// Report type used when the request names none.
pub const DEFAULT_REPORT_TYPE: &str = "comprehensive";

/// A section of the exported report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section heading.
    pub name: String,
    /// Section description.
    pub content: String,
}

/// Describes the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Document title.
    pub title: String,
    /// When the metadata was produced.
    pub generated_at: DateTime<Utc>,
    /// Report flavour.
    pub report_type: String,
    /// Ordered sections.
    pub sections: Vec<ReportSection>,
}

impl ReportMetadata {
    /// Standard analytics report for a test.
    pub fn for_test(test_id: &TestId, report_type: Option<&str>) -> Self {
        let section = |name: &str, content: &str| ReportSection {
            name: name.to_string(),
            content: content.to_string(),
        };

        Self {
            title: format!("Test Analytics Report - Test {test_id}"),
            generated_at: Utc::now(),
            report_type: report_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(DEFAULT_REPORT_TYPE)
                .to_string(),
            sections: vec![
                section("Executive Summary", "Overall test performance and key metrics"),
                section(
                    "Student Performance",
                    "Individual student scores and completion status",
                ),
                section(
                    "Violation Reports",
                    "Detailed violation logs and severity analysis",
                ),
                section(
                    "Recommendations",
                    "Suggestions for academic intervention if needed",
                ),
            ],
        }
    }
}

/// Result of a PDF export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport {
    /// Whether the document can be downloaded.
    pub pdf_ready: bool,
    /// Where to fetch the document.
    pub download_url: String,
    /// Document description.
    pub metadata: ReportMetadata,
}

impl ReportExport {
    /// Export descriptor for a test.
    pub fn for_test(test_id: &TestId, report_type: Option<&str>) -> Self {
        Self {
            pdf_ready: true,
            download_url: format!("/api/reports/download?testId={test_id}&format=pdf"),
            metadata: ReportMetadata::for_test(test_id, report_type),
        }
    }
}
