//! SetLessonStatusHandler - Command handler for teacher status changes.

use std::sync::Arc;

use crate::domain::foundation::{LessonId, UserId};
use crate::domain::lesson::{LessonError, LessonStatus};
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::super::support::{open_lesson, publish_committed};

/// Command to move a lesson to another status.
#[derive(Debug, Clone)]
pub struct SetLessonStatusCommand {
    pub lesson_id: LessonId,
    pub teacher_id: UserId,
    pub status: LessonStatus,
}

/// Result of a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetLessonStatusResult {
    pub previous: LessonStatus,
    pub status: LessonStatus,
}

/// Handler for teacher-driven status changes.
///
/// Canceling a lesson leaves existing enrollments untouched.
pub struct SetLessonStatusHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl SetLessonStatusHandler {
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
        cmd: SetLessonStatusCommand,
    ) -> Result<SetLessonStatusResult, LessonError> {
        let mut session = open_lesson(self.repository.as_ref(), cmd.lesson_id).await?;
        session.roster().lesson().ensure_owned_by(&cmd.teacher_id)?;

        let previous = session
            .roster_mut()
            .set_lesson_status(cmd.status, self.clock.now())
            .inspect_err(|e| {
                tracing::warn!(
                    lesson_id = %cmd.lesson_id,
                    target = %cmd.status,
                    error = %e,
                    "lesson status change rejected"
                )
            })?;
        let status = session.roster().lesson().status();
        let events = session.roster_mut().take_events();
        session.commit().await?;

        tracing::info!(
            lesson_id = %cmd.lesson_id,
            from = %previous,
            to = %status,
            requested = %cmd.status,
            "lesson status set"
        );

        publish_committed(self.event_publisher.as_ref(), events, &cmd.teacher_id).await;

        Ok(SetLessonStatusResult { previous, status })
    }
}
