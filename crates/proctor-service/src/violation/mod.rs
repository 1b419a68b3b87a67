//! Violation recording and queries.

pub mod service;

pub use service::ViolationService;
