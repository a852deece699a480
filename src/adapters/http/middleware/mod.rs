//! HTTP middleware for axum.
//!
//! - `auth` - Caller identity extractors

pub mod auth;

pub use auth::{AuthRejection, AuthenticatedUser, RequireAuth};
