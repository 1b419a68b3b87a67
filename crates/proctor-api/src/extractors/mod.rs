//! Custom Axum extractors.

pub mod json;
pub mod path;

pub use json::{JsonBody, ValidatedJson};
pub use path::parse_session_id;
