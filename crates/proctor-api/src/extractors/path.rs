//! Typed path parameter helpers.

use proctor_core::error::AppError;
use proctor_core::types::SessionId;

/// Parses a session id from a path segment.
pub fn parse_session_id(s: &str) -> Result<SessionId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid session id: {s}")))
}
