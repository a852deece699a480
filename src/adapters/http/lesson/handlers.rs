//! HTTP handlers for lesson endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::invalid_id;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::ApiState;
use crate::application::handlers::{
    CreateLessonCommand, GetLessonPricingQuery, GetLessonQuery, ListEnrollmentsQuery,
    SetLessonStatusCommand, UpdateLessonCommand,
};
use crate::domain::foundation::LessonId;

use super::super::enrollment::EnrollmentListResponse;
use super::dto::{
    LessonResponse, LessonStatusResponse, LessonTermsRequest, PricingResponse,
    SetLessonStatusRequest,
};

fn parse_lesson_id(raw: &str) -> Result<LessonId, Response> {
    raw.parse::<LessonId>().map_err(|_| invalid_id("lesson"))
}

/// POST /api/lessons - Publish a new lesson
pub async fn create_lesson(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<LessonTermsRequest>,
) -> Response {
    let cmd = CreateLessonCommand {
        teacher_id: user.id,
        terms: req.into(),
    };

    match state.create_lesson.handle(cmd).await {
        Ok(result) => {
            let response: LessonResponse = result.view.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/lessons/:id - Lesson with derived pricing
pub async fn get_lesson(State(state): State<ApiState>, Path(lesson_id): Path<String>) -> Response {
    let lesson_id = match parse_lesson_id(&lesson_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    match state.get_lesson.handle(GetLessonQuery { lesson_id }).await {
        Ok(view) => {
            let response: LessonResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/lessons/:id - Replace the lesson terms (owner only)
pub async fn update_lesson(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(lesson_id): Path<String>,
    Json(req): Json<LessonTermsRequest>,
) -> Response {
    let lesson_id = match parse_lesson_id(&lesson_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let cmd = UpdateLessonCommand {
        lesson_id,
        teacher_id: user.id,
        terms: req.into(),
    };

    match state.update_lesson.handle(cmd).await {
        Ok(result) => {
            let response: LessonResponse = result.view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/lessons/:id/status - Teacher status change
pub async fn set_lesson_status(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(lesson_id): Path<String>,
    Json(req): Json<SetLessonStatusRequest>,
) -> Response {
    let lesson_id = match parse_lesson_id(&lesson_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let cmd = SetLessonStatusCommand {
        lesson_id,
        teacher_id: user.id,
        status: req.status,
    };

    match state.set_lesson_status.handle(cmd).await {
        Ok(result) => {
            let response = LessonStatusResponse {
                lesson_id: lesson_id.to_string(),
                previous: result.previous,
                status: result.status,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/lessons/:id/pricing - Current per-student price
pub async fn get_pricing(State(state): State<ApiState>, Path(lesson_id): Path<String>) -> Response {
    let lesson_id = match parse_lesson_id(&lesson_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    match state.get_pricing.handle(GetLessonPricingQuery { lesson_id }).await {
        Ok(quote) => (StatusCode::OK, Json(PricingResponse::from(quote))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/lessons/:id/enrollments - Roster (owner only)
pub async fn list_enrollments(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(lesson_id): Path<String>,
) -> Response {
    let lesson_id = match parse_lesson_id(&lesson_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let query = ListEnrollmentsQuery {
        lesson_id,
        teacher_id: user.id,
    };

    match state.list_enrollments.handle(query).await {
        Ok(enrollments) => {
            let response = EnrollmentListResponse::from(enrollments);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
