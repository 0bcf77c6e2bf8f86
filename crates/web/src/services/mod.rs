//! Business services that span more than one repository call.

pub mod auth;

pub use auth::{AuthError, AuthService};
