//! Report export and analytics.

pub mod service;

pub use service::ReportService;
