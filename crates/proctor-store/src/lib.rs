//! # proctor-store
//!
//! In-memory stores used by Proctor Hub. Each store is an explicit object
//! created at startup and closed at shutdown; nothing here is global.

pub mod archive;
pub mod catalog;
pub mod rf_history;
pub mod submission;
pub mod violation;

pub use archive::SessionArchive;
pub use catalog::TestCatalog;
pub use rf_history::RfScanHistory;
pub use submission::SubmissionLedger;
pub use violation::{InMemoryViolationStore, ViolationStore};
