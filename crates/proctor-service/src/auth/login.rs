//! Login that echoes the user back with an opaque token.
//!
//! No credential is checked; there is no user store to check against.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use proctor_core::error::AppError;
use proctor_core::result::AppResult;
use proctor_entity::user::{UserProfile, UserRole};

/// Token and profile returned on login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Opaque mock token.
    pub token: String,
    /// The signed-in user.
    pub user: UserProfile,
}

/// Issues mock tokens.
#[derive(Debug, Clone, Default)]
pub struct LoginService;

impl LoginService {
    /// Creates a new login service.
    pub fn new() -> Self {
        Self
    }

    /// Sign a user in.
    pub fn login(&self, email: &str, password: &str, role: UserRole) -> AppResult<LoginResult> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Invalid credentials"));
        }

        let token = format!("mock_jwt_token_{}", Utc::now().timestamp_millis());
        info!(email, role = %role, "User logged in");

        Ok(LoginResult {
            token,
            user: UserProfile {
                id: "123".to_string(),
                email: email.to_string(),
                role,
                name: "John Doe".to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_echoes_user() {
        let result = LoginService::new()
            .login("ada@example.com", "secret", UserRole::Admin)
            .expect("login");
        assert!(result.token.starts_with("mock_jwt_token_"));
        assert_eq!(result.user.email, "ada@example.com");
        assert_eq!(result.user.role, UserRole::Admin);
    }

    #[test]
    fn test_empty_email_rejected() {
        assert!(LoginService::new()
            .login("  ", "secret", UserRole::Student)
            .is_err());
    }
}
