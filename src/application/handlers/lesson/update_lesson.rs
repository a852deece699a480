//! UpdateLessonHandler - Command handler for teacher edits.

use std::sync::Arc;

use crate::domain::foundation::{LessonId, UserId};
use crate::domain::lesson::{LessonError, LessonTerms};
use crate::domain::schedule::DeadlinePolicy;
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::LessonView;
use super::super::support::{open_lesson, publish_committed};

/// Command to replace a lesson's terms.
#[derive(Debug, Clone)]
pub struct UpdateLessonCommand {
    pub lesson_id: LessonId,
    pub teacher_id: UserId,
    pub terms: LessonTerms,
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct UpdateLessonResult {
    pub view: LessonView,
}

/// Handler for editing lessons.
///
/// The deadline is recomputed from the new start date and applies at once,
/// including to students already enrolled.
pub struct UpdateLessonHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    policy: DeadlinePolicy,
}

impl UpdateLessonHandler {
    pub fn new(
        repository: Arc<dyn RosterRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        policy: DeadlinePolicy,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            clock,
            policy,
        }
    }

    pub async fn handle(&self, cmd: UpdateLessonCommand) -> Result<UpdateLessonResult, LessonError> {
        let mut session = open_lesson(self.repository.as_ref(), cmd.lesson_id).await?;
        session.roster().lesson().ensure_owned_by(&cmd.teacher_id)?;

        let now = self.clock.now();
        let previous_deadline = session.roster().lesson().deadline();
        let lesson = session
            .roster_mut()
            .update_terms(cmd.terms, &self.policy, now)
            .inspect_err(|e| {
                tracing::warn!(lesson_id = %cmd.lesson_id, error = %e, "lesson edit rejected")
            })?
            .clone();
        let events = session.roster_mut().take_events();
        session.commit().await?;

        if lesson.deadline() != previous_deadline {
            tracing::info!(
                lesson_id = %cmd.lesson_id,
                from = %previous_deadline,
                to = %lesson.deadline(),
                "lesson deadline moved"
            );
        }
        tracing::info!(lesson_id = %cmd.lesson_id, status = %lesson.status(), "lesson updated");

        publish_committed(self.event_publisher.as_ref(), events, &cmd.teacher_id).await;

        Ok(UpdateLessonResult {
            view: LessonView::at(lesson, now),
        })
    }
}
