//! Report export and per-test analytics.

pub mod analytics;
pub mod export;

pub use analytics::{SessionOutcomeCounts, TestAnalytics};
pub use export::{ReportExport, ReportMetadata, ReportSection};
