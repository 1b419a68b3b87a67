//! Route handlers organized by domain.

pub mod ai;
pub mod auth;
pub mod hardware;
pub mod health;
pub mod reports;
pub mod sessions;
pub mod violations;
