//! RequestRefundHandler - Command handler for refund requests after the deadline.

use std::sync::Arc;

use crate::domain::enrollment::{Enrollment, EnrollmentError};
use crate::domain::foundation::{EnrollmentId, UserId};
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::super::support::{open_enrollment, publish_committed};

/// Command to ask for a refund once free cancellation is over.
#[derive(Debug, Clone)]
pub struct RequestRefundCommand {
    pub enrollment_id: EnrollmentId,
    pub student_id: UserId,
}

/// Result of a refund request.
#[derive(Debug, Clone)]
pub struct RequestRefundResult {
    pub enrollment: Enrollment,
}

/// Handler for refund requests.
///
/// The seat is released immediately; settlement approves the refund later.
pub struct RequestRefundHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl RequestRefundHandler {
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
        cmd: RequestRefundCommand,
    ) -> Result<RequestRefundResult, EnrollmentError> {
        let mut session = open_enrollment(self.repository.as_ref(), cmd.enrollment_id).await?;
        session
            .roster()
            .require_enrollment(cmd.enrollment_id)?
            .ensure_owned_by(&cmd.student_id)?;

        let enrollment = session
            .roster_mut()
            .request_refund(cmd.enrollment_id, self.clock.now())
            .inspect_err(|e| {
                tracing::warn!(
                    enrollment_id = %cmd.enrollment_id,
                    error = %e,
                    "refund request rejected"
                )
            })?
            .clone();
        let events = session.roster_mut().take_events();
        session.commit().await?;

        tracing::info!(
            enrollment_id = %cmd.enrollment_id,
            lesson_id = %enrollment.lesson_id(),
            "refund requested"
        );

        publish_committed(self.event_publisher.as_ref(), events, &cmd.student_id).await;

        Ok(RequestRefundResult { enrollment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::fixtures::*;
    use crate::domain::enrollment::EnrollmentStatus;
    use crate::domain::foundation::LessonId;

    fn handler(f: &Fixture) -> RequestRefundHandler {
        RequestRefundHandler::new(f.store.clone(), f.bus.clone(), f.clock.clone())
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

    fn command(enrollment_id: EnrollmentId, n: u32) -> RequestRefundCommand {
        RequestRefundCommand {
            enrollment_id,
            student_id: student(n),
        }
    }

    #[tokio::test]
    async fn requests_refund_after_deadline_and_frees_seat() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;
        f.clock.set(after_deadline());

        let result = handler(&f).handle(command(id, 1)).await.unwrap();

        assert_eq!(result.enrollment.status(), EnrollmentStatus::RefundRequested);
        assert_eq!(result.enrollment.refund_requested_at(), Some(after_deadline()));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 0);
        assert!(f.bus.has_event("enrollment.refund_requested.v1"));
    }

    #[tokio::test]
    async fn rejected_while_free_cancellation_is_open() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;

        let err = handler(&f).handle(command(id, 1)).await.unwrap_err();

        assert_eq!(err, EnrollmentError::CancellationWindowStillOpen(id));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 1);
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn finalized_enrollment_wins_over_window() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;
        let mut session = f.store.open(lesson_id).await.unwrap().unwrap();
        session.roster_mut().cancel(id, before_deadline()).unwrap();
        session.commit().await.unwrap();

        let err = handler(&f).handle(command(id, 1)).await.unwrap_err();

        assert!(matches!(err, EnrollmentError::AlreadyFinalized { .. }));
    }

    #[tokio::test]
    async fn only_the_student_may_request() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = enrolled(&f, lesson_id, 1).await;
        f.clock.set(after_deadline());

        let err = handler(&f).handle(command(id, 3)).await.unwrap_err();

        assert!(matches!(err, EnrollmentError::Forbidden { .. }));
    }
}
