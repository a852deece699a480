//! ListEnrollmentsHandler - Query handler for a lesson's roster.

use std::sync::Arc;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{LessonId, UserId};
use crate::domain::lesson::LessonError;
use crate::ports::RosterReader;

/// Query for every enrollment of a lesson, in enrollment order.
#[derive(Debug, Clone)]
pub struct ListEnrollmentsQuery {
    pub lesson_id: LessonId,
    pub teacher_id: UserId,
}

/// Handler listing a lesson's roster. Only the owning teacher may read it.
pub struct ListEnrollmentsHandler {
    reader: Arc<dyn RosterReader>,
}

impl ListEnrollmentsHandler {
    pub fn new(reader: Arc<dyn RosterReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListEnrollmentsQuery) -> Result<Vec<Enrollment>, LessonError> {
        let lesson = self
            .reader
            .find_lesson(query.lesson_id)
            .await?
            .ok_or_else(|| LessonError::not_found(query.lesson_id))?;

        lesson.ensure_owned_by(&query.teacher_id)?;

        Ok(self.reader.list_enrollments(query.lesson_id).await?)
    }
}
