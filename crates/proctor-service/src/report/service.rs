//! Report service.

use std::sync::Arc;

use tracing::info;

use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_core::types::TestId;
use proctor_entity::report::{ReportExport, SessionOutcomeCounts, TestAnalytics};
use proctor_entity::violation::ViolationFilter;
use proctor_store::{TestCatalog, ViolationStore};

use crate::exam::ExamSessionManager;

/// Builds report exports and per-test analytics.
#[derive(Debug, Clone)]
pub struct ReportService {
    catalog: Arc<TestCatalog>,
    violations: Arc<dyn ViolationStore>,
    sessions: Arc<ExamSessionManager>,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(
        catalog: Arc<TestCatalog>,
        violations: Arc<dyn ViolationStore>,
        sessions: Arc<ExamSessionManager>,
    ) -> Self {
        Self {
            catalog,
            violations,
            sessions,
        }
    }

    /// Describe the PDF export of a test report.
    pub fn export_pdf(&self, test_id: &TestId, report_type: Option<&str>) -> AppResult<ReportExport> {
        if test_id.is_blank() {
            return Err(AppError::validation("testId is required"));
        }
        let export = ReportExport::for_test(test_id, report_type);
        info!(
            test_id = %test_id,
            report_type = %export.metadata.report_type,
            "Report export prepared"
        );
        Ok(export)
    }

    /// Session outcomes and violations of one test.
    pub async fn test_analytics(&self, test_id: &TestId) -> AppResult<TestAnalytics> {
        self.catalog.get(test_id)?;

        let mut sessions = SessionOutcomeCounts::default();
        for report in self.sessions.sessions_for_test(test_id).await {
            sessions.add(report.session.status(), report.session.termination_reason());
        }

        let violations = self
            .violations
            .query(&ViolationFilter {
                test_id: Some(test_id.clone()),
                student_id: None,
            })
            .await?;

        Ok(TestAnalytics {
            test_id: test_id.clone(),
            sessions,
            violations,
        })
    }
}
