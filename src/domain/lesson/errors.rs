//! Lesson-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | NotActive | 409 |
//! | Full | 409 |
//! | AlreadyStarted | 409 |
//! | InvalidTransition | 409 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | CapacityUnderflow | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, LessonId, UserId, ValidationError};

use super::LessonStatus;

/// Lesson-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonError {
    /// Lesson was not found.
    NotFound(LessonId),

    /// Lesson is not recruiting (closed or canceled).
    NotActive {
        lesson_id: LessonId,
        status: LessonStatus,
    },

    /// Every seat is taken.
    Full {
        lesson_id: LessonId,
        max_student: u32,
    },

    /// Lesson has already started and can no longer be edited.
    AlreadyStarted(LessonId),

    /// Requested status change is not allowed.
    InvalidTransition {
        from: LessonStatus,
        to: LessonStatus,
    },

    /// Caller does not own the lesson.
    Forbidden {
        lesson_id: LessonId,
        user_id: UserId,
    },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// A seat release would drive the head count below zero.
    CapacityUnderflow(LessonId),

    /// Infrastructure error.
    Infrastructure(String),
}

impl LessonError {
    pub fn not_found(id: LessonId) -> Self {
        LessonError::NotFound(id)
    }

    pub fn not_active(lesson_id: LessonId, status: LessonStatus) -> Self {
        LessonError::NotActive { lesson_id, status }
    }

    pub fn full(lesson_id: LessonId, max_student: u32) -> Self {
        LessonError::Full {
            lesson_id,
            max_student,
        }
    }

    pub fn invalid_transition(from: LessonStatus, to: LessonStatus) -> Self {
        LessonError::InvalidTransition { from, to }
    }

    pub fn forbidden(lesson_id: LessonId, user_id: UserId) -> Self {
        LessonError::Forbidden { lesson_id, user_id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LessonError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        LessonError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LessonError::NotFound(_) => ErrorCode::LessonNotFound,
            LessonError::NotActive { .. } => ErrorCode::LessonNotActive,
            LessonError::Full { .. } => ErrorCode::LessonFull,
            LessonError::AlreadyStarted(_) => ErrorCode::LessonAlreadyStarted,
            LessonError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            LessonError::Forbidden { .. } => ErrorCode::Forbidden,
            LessonError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            LessonError::CapacityUnderflow(_) => ErrorCode::InternalError,
            LessonError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            LessonError::NotFound(id) => format!("Lesson not found: {}", id),
            LessonError::NotActive { lesson_id, status } => {
                format!("Lesson {} is not accepting enrollments ({})", lesson_id, status)
            }
            LessonError::Full {
                lesson_id,
                max_student,
            } => format!(
                "Lesson {} is full ({} of {} seats taken)",
                lesson_id, max_student, max_student
            ),
            LessonError::AlreadyStarted(id) => {
                format!("Lesson {} has already started and can no longer be edited", id)
            }
            LessonError::InvalidTransition { from, to } => {
                format!("Cannot change lesson status from {} to {}", from, to)
            }
            LessonError::Forbidden { lesson_id, user_id } => {
                format!("User {} does not own lesson {}", user_id, lesson_id)
            }
            LessonError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            LessonError::CapacityUnderflow(id) => {
                format!("Lesson {} has no enrolled student to release", id)
            }
            LessonError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LessonError::Infrastructure(_))
    }
}

impl std::fmt::Display for LessonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LessonError {}

impl From<ValidationError> for LessonError {
    fn from(err: ValidationError) -> Self {
        LessonError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for LessonError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => LessonError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => LessonError::Infrastructure(err.to_string()),
        }
    }
}

impl From<LessonError> for DomainError {
    fn from(err: LessonError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
