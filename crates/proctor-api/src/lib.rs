//! # proctor-api
//!
//! HTTP API layer for Proctor Hub built on Axum.
//!
//! Provides the REST endpoints for exam sessions, violations, detection,
//! tests, and reports, plus middleware (CORS, logging), extractors, DTOs,
//! and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Collaborators, build_app, build_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
