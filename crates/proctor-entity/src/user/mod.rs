//! User entities.

pub mod model;

pub use model::{UserProfile, UserRole};
