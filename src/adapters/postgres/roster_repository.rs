//! PostgreSQL implementation of RosterRepository.
//!
//! A session is a transaction that starts with `SELECT ... FOR UPDATE` on the
//! lesson row. Concurrent sessions on the same lesson queue behind that row
//! lock; commit writes the lesson and every new or changed enrollment in the
//! same transaction. Dropping the session rolls the transaction back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{DomainError, EnrollmentId, LessonId};
use crate::domain::lesson::Lesson;
use crate::domain::roster::Roster;
use crate::ports::{RosterRepository, RosterSession};

use super::rows::{
    db_error, enrollment_from_row, lesson_from_row, to_db_count, ENROLLMENT_COLUMNS,
    LESSON_COLUMNS,
};

/// PostgreSQL implementation of the RosterRepository port.
pub struct PostgresRosterRepository {
    pool: PgPool,
}

impl PostgresRosterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterRepository for PostgresRosterRepository {
    async fn insert(&self, roster: &Roster) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        insert_lesson(&mut tx, roster.lesson()).await?;
        for enrollment in roster.enrollments() {
            insert_enrollment(&mut tx, enrollment).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }

    async fn open(
        &self,
        lesson_id: LessonId,
    ) -> Result<Option<Box<dyn RosterSession>>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let lesson_row = sqlx::query(&format!(
            "SELECT {} FROM lessons WHERE id = $1 FOR UPDATE",
            LESSON_COLUMNS
        ))
        .bind(lesson_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock lesson"))?;

        let Some(lesson_row) = lesson_row else {
            return Ok(None);
        };
        let lesson = lesson_from_row(&lesson_row)?;

        let enrollment_rows = sqlx::query(&format!(
            "SELECT {} FROM enrollments WHERE lesson_id = $1 ORDER BY enrolled_at",
            ENROLLMENT_COLUMNS
        ))
        .bind(lesson_id.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("Failed to load enrollments"))?;

        let enrollments = enrollment_rows
            .iter()
            .map(enrollment_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let roster = Roster::reconstitute(lesson, enrollments)?;

        tracing::debug!(%lesson_id, "lesson row locked");
        Ok(Some(Box::new(PostgresRosterSession {
            tx,
            original: roster.clone(),
            working: roster,
        })))
    }

    async fn lesson_id_for(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<LessonId>, DomainError> {
        let row: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT lesson_id FROM enrollments WHERE id = $1")
                .bind(enrollment_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find enrollment"))?;

        Ok(row.map(|(id,)| LessonId::from_uuid(id)))
    }
}

/// Session over one locked lesson row.
struct PostgresRosterSession {
    tx: Transaction<'static, Postgres>,
    original: Roster,
    working: Roster,
}

#[async_trait]
impl RosterSession for PostgresRosterSession {
    fn roster(&self) -> &Roster {
        &self.working
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.working
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let PostgresRosterSession {
            mut tx,
            original,
            working,
        } = *self;

        if working.lesson() != original.lesson() {
            update_lesson(&mut tx, working.lesson()).await?;
        }

        for enrollment in working.enrollments() {
            match original.enrollment(enrollment.id()) {
                None => insert_enrollment(&mut tx, enrollment).await?,
                Some(before) if before != enrollment => {
                    update_enrollment(&mut tx, enrollment).await?
                }
                Some(_) => {}
            }
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        tracing::debug!(lesson_id = %working.lesson().id(), "roster committed");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

async fn insert_lesson(
    tx: &mut Transaction<'static, Postgres>,
    lesson: &Lesson,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO lessons (
            id, teacher_id, title, amount, min_student, max_student, current_student,
            start_date, end_date, deadline, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(lesson.id().as_uuid())
    .bind(lesson.teacher_id().as_str())
    .bind(lesson.title())
    .bind(lesson.amount())
    .bind(to_db_count(lesson.min_student())?)
    .bind(to_db_count(lesson.max_student())?)
    .bind(to_db_count(lesson.current_student())?)
    .bind(lesson.start_date())
    .bind(lesson.end_date())
    .bind(lesson.deadline())
    .bind(lesson.status().as_str())
    .bind(lesson.created_at().as_datetime())
    .bind(lesson.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to insert lesson"))?;

    Ok(())
}

async fn update_lesson(
    tx: &mut Transaction<'static, Postgres>,
    lesson: &Lesson,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE lessons SET
            title = $2,
            amount = $3,
            min_student = $4,
            max_student = $5,
            current_student = $6,
            start_date = $7,
            end_date = $8,
            deadline = $9,
            status = $10,
            updated_at = $11
        WHERE id = $1
        "#,
    )
    .bind(lesson.id().as_uuid())
    .bind(lesson.title())
    .bind(lesson.amount())
    .bind(to_db_count(lesson.min_student())?)
    .bind(to_db_count(lesson.max_student())?)
    .bind(to_db_count(lesson.current_student())?)
    .bind(lesson.start_date())
    .bind(lesson.end_date())
    .bind(lesson.deadline())
    .bind(lesson.status().as_str())
    .bind(lesson.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to update lesson"))?;

    Ok(())
}

async fn insert_enrollment(
    tx: &mut Transaction<'static, Postgres>,
    enrollment: &Enrollment,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO enrollments (
            id, lesson_id, student_id, status, enrolled_at,
            canceled_at, refund_requested_at, refunded_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(enrollment.id().as_uuid())
    .bind(enrollment.lesson_id().as_uuid())
    .bind(enrollment.student_id().as_str())
    .bind(enrollment.status().as_str())
    .bind(enrollment.enrolled_at().as_datetime())
    .bind(enrollment.canceled_at().map(|t| *t.as_datetime()))
    .bind(enrollment.refund_requested_at().map(|t| *t.as_datetime()))
    .bind(enrollment.refunded_at().map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to insert enrollment"))?;

    Ok(())
}

async fn update_enrollment(
    tx: &mut Transaction<'static, Postgres>,
    enrollment: &Enrollment,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE enrollments SET
            status = $2,
            canceled_at = $3,
            refund_requested_at = $4,
            refunded_at = $5
        WHERE id = $1
        "#,
    )
    .bind(enrollment.id().as_uuid())
    .bind(enrollment.status().as_str())
    .bind(enrollment.canceled_at().map(|t| *t.as_datetime()))
    .bind(enrollment.refund_requested_at().map(|t| *t.as_datetime()))
    .bind(enrollment.refunded_at().map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to update enrollment"))?;

    Ok(())
}
