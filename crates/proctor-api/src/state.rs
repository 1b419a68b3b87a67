//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use proctor_core::config::AppConfig;
use proctor_service::{
    DetectionService, ExamSessionManager, LoginService, ReportService, ViolationService,
};
use proctor_store::{TestCatalog, ViolationStore};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Live and finished exam sessions
    pub sessions: Arc<ExamSessionManager>,
    /// Admin-facing violation records
    pub violations: ViolationService,
    /// Store behind `violations`, closed on shutdown
    pub violation_store: Arc<dyn ViolationStore>,
    /// One-shot face, audio, and RF analysis
    pub detection: DetectionService,
    /// Report export and analytics
    pub reports: ReportService,
    /// Mock login
    pub login: LoginService,
    /// Tests sessions are created for
    pub catalog: Arc<TestCatalog>,
    /// Process start, for uptime
    pub started_at: Instant,
}
