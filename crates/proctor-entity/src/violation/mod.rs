//! Violation store rows and their aggregated summary.

pub mod model;
pub mod summary;

pub use model::{NewViolation, ViolationRecord};
pub use summary::{SeverityCounts, ViolationFilter, ViolationSummary};
