//! Login stub.

pub mod login;

pub use login::{LoginResult, LoginService};
