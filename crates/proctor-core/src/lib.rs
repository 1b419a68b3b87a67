//! # proctor-core
//!
//! Core crate for Proctor Hub. Contains the collaborator traits consumed by
//! the exam session runtime, configuration schemas, typed identifiers,
//! violation value types, domain events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Proctor Hub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
