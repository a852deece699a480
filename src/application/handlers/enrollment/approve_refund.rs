//! ApproveRefundHandler - Command handler for settlement approval.

use std::sync::Arc;

use crate::domain::enrollment::{Enrollment, EnrollmentError};
use crate::domain::foundation::{ActorRole, EnrollmentId, UserId};
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::super::support::{open_enrollment, publish_committed};

/// Command to approve a pending refund.
#[derive(Debug, Clone)]
pub struct ApproveRefundCommand {
    pub enrollment_id: EnrollmentId,
    pub actor_id: UserId,
    pub role: ActorRole,
}

/// Result of a refund approval.
#[derive(Debug, Clone)]
pub struct ApproveRefundResult {
    pub enrollment: Enrollment,
}

/// Handler for refund approvals. Only the settlement role may approve.
pub struct ApproveRefundHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl ApproveRefundHandler {
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
        cmd: ApproveRefundCommand,
    ) -> Result<ApproveRefundResult, EnrollmentError> {
        if cmd.role != ActorRole::Settlement {
            tracing::warn!(
                enrollment_id = %cmd.enrollment_id,
                actor_id = %cmd.actor_id,
                role = %cmd.role,
                "refund approval by non-settlement caller"
            );
            return Err(EnrollmentError::forbidden(cmd.enrollment_id, cmd.actor_id));
        }

        let mut session = open_enrollment(self.repository.as_ref(), cmd.enrollment_id).await?;
        let enrollment = session
            .roster_mut()
            .approve_refund(cmd.enrollment_id, self.clock.now())
            .inspect_err(|e| {
                tracing::warn!(
                    enrollment_id = %cmd.enrollment_id,
                    error = %e,
                    "refund approval rejected"
                )
            })?
            .clone();
        let events = session.roster_mut().take_events();
        session.commit().await?;

        tracing::info!(
            enrollment_id = %cmd.enrollment_id,
            lesson_id = %enrollment.lesson_id(),
            "refund approved"
        );

        publish_committed(self.event_publisher.as_ref(), events, &cmd.actor_id).await;

        Ok(ApproveRefundResult { enrollment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::fixtures::*;
    use crate::domain::enrollment::EnrollmentStatus;
    use crate::domain::foundation::LessonId;

    fn handler(f: &Fixture) -> ApproveRefundHandler {
        ApproveRefundHandler::new(f.store.clone(), f.bus.clone(), f.clock.clone())
    }

    fn settlement() -> UserId {
        UserId::new("settlement-service").unwrap()
    }

    fn command(enrollment_id: EnrollmentId) -> ApproveRefundCommand {
        ApproveRefundCommand {
            enrollment_id,
            actor_id: settlement(),
            role: ActorRole::Settlement,
        }
    }

    /// Enrolls before the deadline and requests a refund after it.
    async fn refund_requested(f: &Fixture, lesson_id: LessonId) -> EnrollmentId {
        let mut session = f.store.open(lesson_id).await.unwrap().unwrap();
        let id = EnrollmentId::new();
        session
            .roster_mut()
            .enroll(id, student(1), before_deadline())
            .unwrap();
        session
            .roster_mut()
            .request_refund(id, after_deadline())
            .unwrap();
        session.commit().await.unwrap();
        id
    }

    #[tokio::test]
    async fn approves_pending_refund_without_touching_capacity() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = refund_requested(&f, lesson_id).await;
        f.clock.set(after_deadline());

        let result = handler(&f).handle(command(id)).await.unwrap();

        assert_eq!(result.enrollment.status(), EnrollmentStatus::Refunded);
        assert_eq!(result.enrollment.refunded_at(), Some(after_deadline()));
        assert_eq!(f.stored_lesson(lesson_id).await.current_student(), 0);
        assert!(f.bus.has_event("enrollment.refunded.v1"));
    }

    #[tokio::test]
    async fn enrolled_seat_cannot_be_refunded() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let mut session = f.store.open(lesson_id).await.unwrap().unwrap();
        let id = EnrollmentId::new();
        session
            .roster_mut()
            .enroll(id, student(1), before_deadline())
            .unwrap();
        session.commit().await.unwrap();

        let err = handler(&f).handle(command(id)).await.unwrap_err();

        assert!(matches!(
            err,
            EnrollmentError::NotInRefundRequestedState {
                status: EnrollmentStatus::Enrolled,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn second_approval_is_rejected() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = refund_requested(&f, lesson_id).await;
        handler(&f).handle(command(id)).await.unwrap();

        let err = handler(&f).handle(command(id)).await.unwrap_err();

        assert!(matches!(err, EnrollmentError::NotInRefundRequestedState { .. }));
        assert_eq!(f.bus.events_of_type("enrollment.refunded.v1").len(), 1);
    }

    #[tokio::test]
    async fn members_may_not_approve() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 4).await;
        let id = refund_requested(&f, lesson_id).await;

        let err = handler(&f)
            .handle(ApproveRefundCommand {
                enrollment_id: id,
                actor_id: student(1),
                role: ActorRole::Member,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EnrollmentError::Forbidden { .. }));
        assert_eq!(f.bus.event_count(), 0);
    }
}
