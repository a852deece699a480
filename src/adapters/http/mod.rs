//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure; this
//! module assembles them under `/api` next to the liveness probe.

pub mod enrollment;
pub mod error;
pub mod lesson;
pub mod middleware;
mod state;

use axum::{routing::get, Json, Router};

pub use error::ErrorResponse;
pub use state::ApiState;

/// Builds the full application router.
///
/// # Routes
/// - `GET /health` - Liveness
/// - `/api/lessons/...` - see [`lesson::lesson_routes`]
/// - `/api/enrollments/...` - see [`enrollment::enrollment_routes`]
pub fn api_router(state: ApiState) -> Router {
    let api = Router::new()
        .nest("/lessons", lesson::lesson_routes())
        .nest("/enrollments", enrollment::enrollment_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
