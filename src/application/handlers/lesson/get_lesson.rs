//! GetLessonHandler - Query handler for a lesson with its derived values.

use std::sync::Arc;

use crate::domain::foundation::{LessonId, Timestamp};
use crate::domain::lesson::{Lesson, LessonError};
use crate::domain::pricing::PriceQuote;
use crate::domain::schedule::CancellationWindow;
use crate::ports::{Clock, RosterReader};

/// Query to get a lesson by ID.
#[derive(Debug, Clone, Copy)]
pub struct GetLessonQuery {
    pub lesson_id: LessonId,
}

/// A lesson together with the values computed on read.
#[derive(Debug, Clone)]
pub struct LessonView {
    pub lesson: Lesson,
    pub pricing: PriceQuote,
    pub cancellation_window: CancellationWindow,
    pub remaining_seats: u32,
}

impl LessonView {
    /// Derives the read-time values of `lesson` as of `now`.
    pub fn at(lesson: Lesson, now: Timestamp) -> Self {
        Self {
            pricing: lesson.price_quote(),
            cancellation_window: lesson.cancellation_window(now),
            remaining_seats: lesson.remaining_seats(),
            lesson,
        }
    }
}

/// Handler for retrieving lesson details. Open to every caller.
pub struct GetLessonHandler {
    reader: Arc<dyn RosterReader>,
    clock: Arc<dyn Clock>,
}

impl GetLessonHandler {
    pub fn new(reader: Arc<dyn RosterReader>, clock: Arc<dyn Clock>) -> Self {
        Self { reader, clock }
    }

    pub async fn handle(&self, query: GetLessonQuery) -> Result<LessonView, LessonError> {
        let lesson = self
            .reader
            .find_lesson(query.lesson_id)
            .await?
            .ok_or_else(|| LessonError::not_found(query.lesson_id))?;

        Ok(LessonView::at(lesson, self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::fixtures::*;
    use crate::domain::foundation::{EnrollmentId, Percentage};
    use crate::ports::RosterRepository;

    fn handler(f: &Fixture) -> GetLessonHandler {
        GetLessonHandler::new(f.store.clone(), f.clock.clone())
    }

    #[tokio::test]
    async fn view_carries_pricing_and_seats() {
        let f = Fixture::new();
        let lesson_id = f.lesson(4, 6).await;
        let mut session = f.store.open(lesson_id).await.unwrap().unwrap();
        for n in 0..4 {
            session
                .roster_mut()
                .enroll(EnrollmentId::new(), student(n), before_deadline())
                .unwrap();
        }
        session.commit().await.unwrap();

        let view = handler(&f)
            .handle(GetLessonQuery { lesson_id })
            .await
            .unwrap();

        assert_eq!(view.pricing.per_student, 50_000);
        assert_eq!(view.pricing.discount_rate, Percentage::new(75));
        assert_eq!(view.remaining_seats, 2);
        assert_eq!(view.cancellation_window, CancellationWindow::Open);
    }

    #[tokio::test]
    async fn window_follows_the_clock() {
        let f = Fixture::new();
        let lesson_id = f.lesson(1, 2).await;
        f.clock.set(after_deadline());

        let view = handler(&f)
            .handle(GetLessonQuery { lesson_id })
            .await
            .unwrap();

        assert_eq!(view.cancellation_window, CancellationWindow::Closed);
    }

    #[tokio::test]
    async fn unknown_lesson_is_not_found() {
        let f = Fixture::new();
        let lesson_id = LessonId::new();

        let err = handler(&f)
            .handle(GetLessonQuery { lesson_id })
            .await
            .unwrap_err();

        assert_eq!(err, LessonError::NotFound(lesson_id));
    }
}
