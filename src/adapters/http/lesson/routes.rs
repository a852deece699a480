//! HTTP routes for lesson endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::adapters::http::enrollment::enroll;
use crate::adapters::http::state::ApiState;

use super::handlers::{
    create_lesson, get_lesson, get_pricing, list_enrollments, set_lesson_status, update_lesson,
};

/// Lesson routes, mounted at `/api/lessons`.
///
/// # Routes
/// - `POST /` - Publish a lesson
/// - `GET /:id` - Lesson view with pricing
/// - `PATCH /:id` - Edit terms (owner)
/// - `PATCH /:id/status` - Change status (owner)
/// - `GET /:id/pricing` - Current price
/// - `GET /:id/enrollments` - Roster (owner)
/// - `POST /:id/enrollments` - Enroll the caller
pub fn lesson_routes() -> Router<ApiState> {
    Router::new()
        .route("/", post(create_lesson))
        .route("/:id", get(get_lesson).patch(update_lesson))
        .route("/:id/status", patch(set_lesson_status))
        .route("/:id/pricing", get(get_pricing))
        .route("/:id/enrollments", get(list_enrollments).post(enroll))
}
