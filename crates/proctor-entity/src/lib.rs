//! # proctor-entity
//!
//! Domain entity models for Proctor Hub. The exam session state machine
//! lives here together with the records it produces: violation rows,
//! test definitions, detection results, and report metadata. All entities
//! derive `Debug`, `Clone`, and `Serialize`.

pub mod detection;
pub mod exam;
pub mod report;
pub mod session;
pub mod user;
pub mod violation;
