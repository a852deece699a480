//! EnrollHandler - Command handler for taking a seat in a lesson.

use std::sync::Arc;

use crate::domain::enrollment::{Enrollment, EnrollmentError};
use crate::domain::foundation::{EnrollmentId, LessonId, UserId};
use crate::domain::lesson::LessonError;
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::super::support::{open_lesson, publish_committed};

/// Command to enroll a student.
#[derive(Debug, Clone)]
pub struct EnrollCommand {
    pub lesson_id: LessonId,
    pub student_id: UserId,
}

/// Result of successful enrollment.
#[derive(Debug, Clone)]
pub struct EnrollResult {
    pub enrollment: Enrollment,
    /// Head count after this student joined.
    pub current_student: u32,
}

/// Handler for enrollments.
///
/// The capacity check and the increment happen inside one roster session,
/// so concurrent requests for the last seat produce exactly one winner.
pub struct EnrollHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl EnrollHandler {
    pub fn new(
        repository: Arc<dyn RosterRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            clock,
        }
    }

    pub async fn handle(&self, cmd: EnrollCommand) -> Result<EnrollResult, EnrollmentError> {
        let mut session = open_lesson(self.repository.as_ref(), cmd.lesson_id)
            .await
            .map_err(EnrollmentError::from)?;

        let enrollment = session
            .roster_mut()
            .enroll(EnrollmentId::new(), cmd.student_id.clone(), self.clock.now())
            .inspect_err(|e| log_rejection(&cmd, e))?
            .clone();
        let current_student = session.roster().lesson().current_student();
        let events = session.roster_mut().take_events();
        session.commit().await?;

        tracing::info!(
            enrollment_id = %enrollment.id(),
            lesson_id = %cmd.lesson_id,
            student_id = %cmd.student_id,
            current_student,
            "student enrolled"
        );

        publish_committed(self.event_publisher.as_ref(), events, &cmd.student_id).await;

        Ok(EnrollResult {
            enrollment,
            current_student,
        })
    }
}

fn log_rejection(cmd: &EnrollCommand, error: &EnrollmentError) {
    match error {
        EnrollmentError::Lesson(LessonError::Full { .. }) => tracing::info!(
            lesson_id = %cmd.lesson_id,
            student_id = %cmd.student_id,
            "enrollment refused, lesson full"
        ),
        _ => tracing::warn!(
            lesson_id = %cmd.lesson_id,
            student_id = %cmd.student_id,
            error = %error,
            "enrollment rejected"
        ),
    }
}
