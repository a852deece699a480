//! Roster reader port (read side).
//!
//! Reads see committed state only and never take the per-lesson lock.

use async_trait::async_trait;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{DomainError, EnrollmentId, LessonId};
use crate::domain::lesson::Lesson;

/// Read-only queries over lessons and enrollments.
#[async_trait]
pub trait RosterReader: Send + Sync {
    /// Returns `None` if the lesson does not exist.
    async fn find_lesson(&self, id: LessonId) -> Result<Option<Lesson>, DomainError>;

    /// Returns `None` if the enrollment does not exist.
    async fn find_enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, DomainError>;

    /// Every enrollment of a lesson, oldest first. Empty if the lesson is unknown.
    async fn list_enrollments(&self, lesson_id: LessonId)
        -> Result<Vec<Enrollment>, DomainError>;
}
