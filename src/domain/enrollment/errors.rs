//! Enrollment-specific error types.
//!
//! Lesson-side rejections raised while enrolling (`LessonFull`,
//! `LessonNotActive`, ...) are carried through the `Lesson` variant so the
//! caller keeps the original error code.

use crate::domain::foundation::{
    DomainError, EnrollmentId, ErrorCode, LessonId, UserId, ValidationError,
};
use crate::domain::lesson::LessonError;

use super::EnrollmentStatus;

/// Enrollment-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// Enrollment was not found.
    NotFound(EnrollmentId),

    /// Student already holds a seat in this lesson.
    AlreadyEnrolled {
        lesson_id: LessonId,
        student_id: UserId,
    },

    /// Enrollment already left `ENROLLED`; repeated calls are a no-op.
    AlreadyFinalized {
        enrollment_id: EnrollmentId,
        status: EnrollmentStatus,
    },

    /// Free cancellation is over; a refund request is required.
    CancellationWindowClosed(EnrollmentId),

    /// Free cancellation is still possible; refund requests are not accepted.
    CancellationWindowStillOpen(EnrollmentId),

    /// Refund approval on an enrollment that never asked for one.
    NotInRefundRequestedState {
        enrollment_id: EnrollmentId,
        status: EnrollmentStatus,
    },

    /// Caller may not act on this enrollment.
    Forbidden {
        enrollment_id: EnrollmentId,
        user_id: UserId,
    },

    /// Rejection raised by the owning lesson.
    Lesson(LessonError),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl EnrollmentError {
    pub fn not_found(id: EnrollmentId) -> Self {
        EnrollmentError::NotFound(id)
    }

    pub fn already_enrolled(lesson_id: LessonId, student_id: UserId) -> Self {
        EnrollmentError::AlreadyEnrolled {
            lesson_id,
            student_id,
        }
    }

    pub fn already_finalized(enrollment_id: EnrollmentId, status: EnrollmentStatus) -> Self {
        EnrollmentError::AlreadyFinalized {
            enrollment_id,
            status,
        }
    }

    pub fn forbidden(enrollment_id: EnrollmentId, user_id: UserId) -> Self {
        EnrollmentError::Forbidden {
            enrollment_id,
            user_id,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EnrollmentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EnrollmentError::NotFound(_) => ErrorCode::EnrollmentNotFound,
            EnrollmentError::AlreadyEnrolled { .. } => ErrorCode::AlreadyEnrolled,
            EnrollmentError::AlreadyFinalized { .. } => ErrorCode::EnrollmentAlreadyFinalized,
            EnrollmentError::CancellationWindowClosed(_) => ErrorCode::CancellationWindowClosed,
            EnrollmentError::CancellationWindowStillOpen(_) => {
                ErrorCode::CancellationWindowStillOpen
            }
            EnrollmentError::NotInRefundRequestedState { .. } => {
                ErrorCode::NotInRefundRequestedState
            }
            EnrollmentError::Forbidden { .. } => ErrorCode::Forbidden,
            EnrollmentError::Lesson(err) => err.code(),
            EnrollmentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            EnrollmentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            EnrollmentError::NotFound(id) => format!("Enrollment not found: {}", id),
            EnrollmentError::AlreadyEnrolled {
                lesson_id,
                student_id,
            } => format!(
                "Student {} is already enrolled in lesson {}",
                student_id, lesson_id
            ),
            EnrollmentError::AlreadyFinalized {
                enrollment_id,
                status,
            } => format!(
                "Enrollment {} has already been finalized ({})",
                enrollment_id, status
            ),
            EnrollmentError::CancellationWindowClosed(id) => format!(
                "The cancellation deadline for enrollment {} has passed; request a refund instead",
                id
            ),
            EnrollmentError::CancellationWindowStillOpen(id) => format!(
                "Enrollment {} can still be canceled free of charge; cancel it instead",
                id
            ),
            EnrollmentError::NotInRefundRequestedState {
                enrollment_id,
                status,
            } => format!(
                "Enrollment {} has no pending refund request ({})",
                enrollment_id, status
            ),
            EnrollmentError::Forbidden {
                enrollment_id,
                user_id,
            } => format!(
                "User {} may not act on enrollment {}",
                user_id, enrollment_id
            ),
            EnrollmentError::Lesson(err) => err.message(),
            EnrollmentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            EnrollmentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            EnrollmentError::Infrastructure(_) => true,
            EnrollmentError::Lesson(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl std::fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EnrollmentError {}

impl From<LessonError> for EnrollmentError {
    fn from(err: LessonError) -> Self {
        match err {
            LessonError::Infrastructure(msg) => EnrollmentError::Infrastructure(msg),
            other => EnrollmentError::Lesson(other),
        }
    }
}

impl From<ValidationError> for EnrollmentError {
    fn from(err: ValidationError) -> Self {
        EnrollmentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for EnrollmentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => EnrollmentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => EnrollmentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<EnrollmentError> for DomainError {
    fn from(err: EnrollmentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
