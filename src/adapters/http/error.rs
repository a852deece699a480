//! Error responses shared by every endpoint.
//!
//! Every domain error carries a stable `ErrorCode`; the status is derived
//! from the code so the lesson and enrollment endpoints always agree.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::enrollment::EnrollmentError;
use crate::domain::foundation::ErrorCode;
use crate::domain::lesson::LessonError;

/// Standard error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::LessonNotFound | ErrorCode::EnrollmentNotFound => StatusCode::NOT_FOUND,
        ErrorCode::LessonNotActive
        | ErrorCode::LessonFull
        | ErrorCode::LessonAlreadyStarted
        | ErrorCode::InvalidStateTransition
        | ErrorCode::AlreadyEnrolled
        | ErrorCode::EnrollmentAlreadyFinalized
        | ErrorCode::CancellationWindowClosed
        | ErrorCode::CancellationWindowStillOpen
        | ErrorCode::NotInRefundRequestedState => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(code: ErrorCode, message: String) -> Response {
    let status = status_for(code);
    if status.is_server_error() {
        tracing::error!(code = %code, message = %message, "request failed");
    }
    (status, Json(ErrorResponse::new(code.to_string(), message))).into_response()
}

/// Response for a rejected path parameter.
pub fn invalid_id(kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", kind))),
    )
        .into_response()
}

impl IntoResponse for LessonError {
    fn into_response(self) -> Response {
        error_response(self.code(), self.message())
    }
}

impl IntoResponse for EnrollmentError {
    fn into_response(self) -> Response {
        error_response(self.code(), self.message())
    }
}
