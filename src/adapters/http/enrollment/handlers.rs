//! HTTP handlers for enrollment endpoints.

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
    ApproveRefundCommand, CancelEnrollmentCommand, EnrollCommand, RequestRefundCommand,
};
use crate::domain::foundation::{EnrollmentId, LessonId};

use super::dto::{EnrollResponse, EnrollmentResponse};

/// POST /api/lessons/:id/enrollments - Enroll the caller
pub async fn enroll(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(lesson_id): Path<String>,
) -> Response {
    let Ok(lesson_id) = lesson_id.parse::<LessonId>() else {
        return invalid_id("lesson");
    };

    let cmd = EnrollCommand {
        lesson_id,
        student_id: user.id,
    };

    match state.enroll.handle(cmd).await {
        Ok(result) => {
            let response = EnrollResponse {
                enrollment_id: result.enrollment.id().to_string(),
                current_student: result.current_student,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/enrollments/:id/cancel - Free cancellation before the deadline
pub async fn cancel_enrollment(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(enrollment_id): Path<String>,
) -> Response {
    let Ok(enrollment_id) = enrollment_id.parse::<EnrollmentId>() else {
        return invalid_id("enrollment");
    };

    let cmd = CancelEnrollmentCommand {
        enrollment_id,
        student_id: user.id,
    };

    match state.cancel_enrollment.handle(cmd).await {
        Ok(result) => ok(result.enrollment.into()),
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/enrollments/:id/refund-request - Refund request after the deadline
pub async fn request_refund(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(enrollment_id): Path<String>,
) -> Response {
    let Ok(enrollment_id) = enrollment_id.parse::<EnrollmentId>() else {
        return invalid_id("enrollment");
    };

    let cmd = RequestRefundCommand {
        enrollment_id,
        student_id: user.id,
    };

    match state.request_refund.handle(cmd).await {
        Ok(result) => ok(result.enrollment.into()),
        Err(e) => e.into_response(),
    }
}

/// PATCH /api/enrollments/:id/refund-approval - Settlement approval
pub async fn approve_refund(
    State(state): State<ApiState>,
    RequireAuth(user): RequireAuth,
    Path(enrollment_id): Path<String>,
) -> Response {
    let Ok(enrollment_id) = enrollment_id.parse::<EnrollmentId>() else {
        return invalid_id("enrollment");
    };

    let cmd = ApproveRefundCommand {
        enrollment_id,
        actor_id: user.id,
        role: user.role,
    };

    match state.approve_refund.handle(cmd).await {
        Ok(result) => ok(result.enrollment.into()),
        Err(e) => e.into_response(),
    }
}

fn ok(response: EnrollmentResponse) -> Response {
    (StatusCode::OK, Json(response)).into_response()
}
