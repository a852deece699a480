//! HTTP routes for enrollment endpoints.

use axum::{routing::patch, Router};

use crate::adapters::http::state::ApiState;

use super::handlers::{approve_refund, cancel_enrollment, request_refund};

/// Enrollment routes, mounted at `/api/enrollments`.
///
/// Enrolling lives under the lesson routes (`POST /api/lessons/:id/enrollments`).
pub fn enrollment_routes() -> Router<ApiState> {
    Router::new()
        .route("/:id/cancel", patch(cancel_enrollment))
        .route("/:id/refund-request", patch(request_refund))
        .route("/:id/refund-approval", patch(approve_refund))
}
