//! CancelEnrollmentHandler - Command handler for free cancellation.

use std::sync::Arc;

use crate::domain::enrollment::{Enrollment, EnrollmentError};
use crate::domain::foundation::{EnrollmentId, UserId};
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::super::support::{open_enrollment, publish_committed};

/// Command to cancel an enrollment before the deadline.
#[derive(Debug, Clone)]
pub struct CancelEnrollmentCommand {
    pub enrollment_id: EnrollmentId,
    pub student_id: UserId,
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelEnrollmentResult {
    pub enrollment: Enrollment,
}

/// Handler for student cancellations.
///
/// A seat freed here never reopens a closed lesson.
pub struct CancelEnrollmentHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl CancelEnrollmentHandler {
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

    pub async fn handle(
        &self,
        cmd: CancelEnrollmentCommand,
    ) -> Result<CancelEnrollmentResult, EnrollmentError> {
        let mut session = open_enrollment(self.repository.as_ref(), cmd.enrollment_id).await?;
        session
            .roster()
            .require_enrollment(cmd.enrollment_id)?
            .ensure_owned_by(&cmd.student_id)?;

        let enrollment = session
            .roster_mut()
            .cancel(cmd.enrollment_id, self.clock.now())
            .inspect_err(|e| {
                tracing::warn!(
                    enrollment_id = %cmd.enrollment_id,
                    error = %e,
                    "cancellation rejected"
                )
            })?
            .clone();
        let events = session.roster_mut().take_events();
        session.commit().await?;

        tracing::info!(
            enrollment_id = %cmd.enrollment_id,
            lesson_id = %enrollment.lesson_id(),
            "enrollment canceled"
        );

        publish_committed(self.event_publisher.as_ref(), events, &cmd.student_id).await;

        Ok(CancelEnrollmentResult { enrollment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::fixtures::*;
    use crate::domain::enrollment::EnrollmentStatus;
    use crate::domain::foundation::LessonId;
    use crate::domain::lesson::LessonStatus;

    fn handler(f: &Fixture) -> CancelEnrollmentHandler {
        CancelEnrollmentHandler::new(f.store.clone(), f.bus.clone(), f.clock.clone())
    }

    async fn enrolled(f: &Fixture, lesson_id: LessonId, n: u32) -> EnrollmentId {
        let mut session = f.store.open(lesson_id).await.unwrap().unwrap();
        let id = EnrollmentId::new();
        session
            .roster_mut()
            .enroll(id, student(n), before_deadline())
            .unwrap();
        session.commit().await.unwrap();
        id
    }

    fn command(enrollment_id: EnrollmentId, n: u32) -> CancelEnrollmentCommand {
        CancelEnrollmentCommand {
            enrollment_id,
            student_id: student(n),
        }
    }

    #[tokio::test]
    async fn cancels_before_deadline_and_frees_seat() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;

        let result = handler(&f).handle(command(id, 1)).await.unwrap();

        assert_eq!(result.enrollment.status(), EnrollmentStatus::Canceled);
        assert_eq!(result.enrollment.canceled_at(), Some(before_deadline()));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 0);
        assert!(f.bus.has_event("enrollment.canceled.v1"));
    }

    #[tokio::test]
    async fn window_closes_at_deadline_midnight() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;
        f.clock.set(at("2024-06-03T00:00:00Z"));

        let err = handler(&f).handle(command(id, 1)).await.unwrap_err();

        assert_eq!(err, EnrollmentError::CancellationWindowClosed(id));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 1);
    }

    #[tokio::test]
    async fn last_moment_before_deadline_still_cancels() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;
        f.clock.set(at("2024-06-02T23:59:59Z"));

        handler(&f).handle(command(id, 1)).await.unwrap();
    }

    #[tokio::test]
    async fn second_cancel_is_already_finalized() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;
        handler(&f).handle(command(id, 1)).await.unwrap();

        let err = handler(&f).handle(command(id, 1)).await.unwrap_err();

        assert!(matches!(err, EnrollmentError::AlreadyFinalized { .. }));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 0);
        assert_eq!(f.bus.events_of_type("enrollment.canceled.v1").len(), 1);
    }

    #[tokio::test]
    async fn freed_seat_does_not_reopen_closed_lesson() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 1).await;
        let id = enrolled(&f, lesson_id, 1).await;

        handler(&f).handle(command(id, 1)).await.unwrap();

        let lesson = f.stored_lesson(lesson_id).await;
        assert_eq!(lesson.current_student(), 0);
        assert_eq!(lesson.status(), LessonStatus::Closed);
    }

    #[tokio::test]
    async fn only_the_student_may_cancel() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;

        let err = handler(&f).handle(command(id, 2)).await.unwrap_err();

        assert!(matches!(err, EnrollmentError::Forbidden { .. }));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 1);
    }

    #[tokio::test]
    async fn unknown_enrollment_is_not_found() {
        let f = Fixture::new();
        let id = EnrollmentId::new();

        let err = handler(&f).handle(command(id, 1)).await.unwrap_err();

        assert_eq!(err, EnrollmentError::NotFound(id));
    }
}
