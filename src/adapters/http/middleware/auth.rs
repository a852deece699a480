//! Identity extractors for axum.
//!
//! Authentication happens upstream; the gateway forwards the caller as two
//! headers:
//!
//! ```text
//! X-User-Id:   <opaque user id>          (required)
//! X-User-Role: member | settlement       (optional, defaults to member)
//! ```
//!
//! # Example
//!
//! ```ignore
//! async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", user.id)
//! }
//! ```

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{ActorRole, UserId};

use super::super::error::ErrorResponse;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller as asserted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: ActorRole,
}

impl AuthenticatedUser {
    fn from_headers(headers: &HeaderMap) -> Result<Self, AuthRejection> {
        let id = headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|raw| UserId::new(raw.trim()).ok())
            .ok_or(AuthRejection::Unauthenticated)?;

        let role = match headers.get(USER_ROLE_HEADER) {
            None => ActorRole::default(),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| raw.parse::<ActorRole>().ok())
                .ok_or(AuthRejection::InvalidRole)?,
        };

        Ok(Self { id, role })
    }
}

/// Extractor that requires an identified caller.
///
/// Returns 401 when `X-User-Id` is missing or blank.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        AuthenticatedUser::from_headers(&parts.headers).map(RequireAuth)
    }
}

/// Rejection type for identity failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No usable `X-User-Id` header.
    Unauthenticated,
    /// `X-User-Role` is present but not a known role.
    InvalidRole,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHENTICATED", "Authentication required"),
            ),
            AuthRejection::InvalidRole => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_ROLE", "X-User-Role must be 'member' or 'settlement'"),
            ),
        };

        (status, Json(body)).into_response()
    }
}
