//! CreateLessonHandler - Command handler for publishing a new lesson.

use std::sync::Arc;

use crate::domain::foundation::{LessonId, UserId};
use crate::domain::lesson::{Lesson, LessonError, LessonTerms};
use crate::domain::roster::Roster;
use crate::domain::schedule::DeadlinePolicy;
use crate::ports::{Clock, EventPublisher, RosterRepository};

use super::LessonView;
use super::super::support::publish_committed;

/// Command to create a lesson.
#[derive(Debug, Clone)]
pub struct CreateLessonCommand {
    pub teacher_id: UserId,
    pub terms: LessonTerms,
}

/// Result of successful lesson creation.
#[derive(Debug, Clone)]
pub struct CreateLessonResult {
    pub view: LessonView,
}

/// Handler for creating lessons.
///
/// The deadline is derived here from the configured lead time and stored on
/// the lesson.
pub struct CreateLessonHandler {
    repository: Arc<dyn RosterRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    policy: DeadlinePolicy,
}

impl CreateLessonHandler {
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

    pub async fn handle(&self, cmd: CreateLessonCommand) -> Result<CreateLessonResult, LessonError> {
        let now = self.clock.now();

        // 1. Build the aggregate (validates terms, derives deadline)
        let lesson = Lesson::create(
            LessonId::new(),
            cmd.teacher_id.clone(),
            cmd.terms,
            &self.policy,
            now,
        )
        .inspect_err(|e| tracing::warn!(teacher_id = %cmd.teacher_id, error = %e, "lesson rejected"))?;

        // 2. Persist
        let mut roster = Roster::new(lesson.clone());
        self.repository.insert(&roster).await?;

        tracing::info!(
            lesson_id = %lesson.id(),
            teacher_id = %cmd.teacher_id,
            deadline = %lesson.deadline(),
            "lesson created"
        );

        // 3. Publish
        publish_committed(
            self.event_publisher.as_ref(),
            roster.take_events(),
            &cmd.teacher_id,
        )
        .await;

        Ok(CreateLessonResult {
            view: LessonView::at(lesson, now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::fixtures::*;
    use crate::domain::lesson::LessonStatus;
    use chrono::NaiveDate;

    fn handler(f: &Fixture) -> CreateLessonHandler {
        CreateLessonHandler::new(f.store.clone(), f.bus.clone(), f.clock.clone(), f.policy)
    }

    #[tokio::test]
    async fn creates_active_lesson_with_deadline() {
        let f = Fixture::new();

        let result = handler(&f)
            .handle(CreateLessonCommand {
                teacher_id: teacher(),
                terms: terms(4, 8),
            })
            .await
            .unwrap();

        let lesson = f.stored_lesson(result.view.lesson.id()).await;
        assert_eq!(lesson.status(), LessonStatus::Active);
        assert_eq!(lesson.current_student(), 0);
        assert_eq!(lesson.deadline(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[tokio::test]
    async fn publishes_created_event_with_actor() {
        let f = Fixture::new();

        handler(&f)
            .handle(CreateLessonCommand {
                teacher_id: teacher(),
                terms: terms(1, 3),
            })
            .await
            .unwrap();

        let events = f.bus.events_of_type("lesson.created.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.user_id.as_deref(), Some("teacher-1"));
    }

    #[tokio::test]
    async fn rejects_invalid_terms_without_storing() {
        let f = Fixture::new();

        let err = handler(&f)
            .handle(CreateLessonCommand {
                teacher_id: teacher(),
                terms: terms(5, 2),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LessonError::ValidationFailed { .. }));
        assert_eq!(f.store.lesson_count().await, 0);
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn rejects_lesson_starting_today() {
        let f = Fixture::new();
        f.clock.set(at("2024-06-10T06:00:00Z"));

        let err = handler(&f)
            .handle(CreateLessonCommand {
                teacher_id: teacher(),
                terms: terms(1, 2),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LessonError::ValidationFailed { ref field, .. } if field == "start_date"));
    }

    #[tokio::test]
    async fn honours_configured_lead_time() {
        let mut f = Fixture::new();
        f.policy = DeadlinePolicy::new(3).unwrap();

        let result = handler(&f)
            .handle(CreateLessonCommand {
                teacher_id: teacher(),
                terms: terms(1, 2),
            })
            .await
            .unwrap();

        assert_eq!(
            result.view.lesson.deadline(),
            NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()
        );
    }
}
