//! GetLessonPricingHandler - Query handler for the current per-student price.

use std::sync::Arc;

use crate::domain::foundation::LessonId;
use crate::domain::lesson::LessonError;
use crate::domain::pricing::PriceQuote;
use crate::ports::RosterReader;

/// Query for a lesson's current price.
#[derive(Debug, Clone, Copy)]
pub struct GetLessonPricingQuery {
    pub lesson_id: LessonId,
}

/// Handler quoting the group price from the committed head count.
pub struct GetLessonPricingHandler {
    reader: Arc<dyn RosterReader>,
}

impl GetLessonPricingHandler {
    pub fn new(reader: Arc<dyn RosterReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetLessonPricingQuery) -> Result<PriceQuote, LessonError> {
        let lesson = self
            .reader
            .find_lesson(query.lesson_id)
            .await?
            .ok_or_else(|| LessonError::not_found(query.lesson_id))?;

        Ok(lesson.price_quote())
    }
}
