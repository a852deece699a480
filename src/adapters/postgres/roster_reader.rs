//! PostgreSQL implementation of RosterReader.
//!
//! Plain reads under READ COMMITTED; they never wait on an open roster session.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{DomainError, EnrollmentId, LessonId};
use crate::domain::lesson::Lesson;
use crate::ports::RosterReader;

use super::rows::{db_error, enrollment_from_row, lesson_from_row, ENROLLMENT_COLUMNS, LESSON_COLUMNS};

/// PostgreSQL implementation of the RosterReader port.
pub struct PostgresRosterReader {
    pool: PgPool,
}

impl PostgresRosterReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterReader for PostgresRosterReader {
    async fn find_lesson(&self, id: LessonId) -> Result<Option<Lesson>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM lessons WHERE id = $1", LESSON_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch lesson"))?;

        row.as_ref().map(lesson_from_row).transpose()
    }

    async fn find_enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM enrollments WHERE id = $1",
            ENROLLMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch enrollment"))?;

        row.as_ref().map(enrollment_from_row).transpose()
    }

    async fn list_enrollments(&self, lesson_id: LessonId) -> Result<Vec<Enrollment>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM enrollments WHERE lesson_id = $1 ORDER BY enrolled_at",
            ENROLLMENT_COLUMNS
        ))
        .bind(lesson_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch enrollments"))?;

        rows.iter().map(enrollment_from_row).collect()
    }
}
