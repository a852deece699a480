//! Row mapping shared by the PostgreSQL roster adapters.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::enrollment::{Enrollment, EnrollmentSnapshot, EnrollmentStatus};
use crate::domain::foundation::{
    DomainError, EnrollmentId, ErrorCode, LessonId, Timestamp, UserId,
};
use crate::domain::lesson::{Lesson, LessonSnapshot, LessonStatus};

pub(super) const LESSON_COLUMNS: &str = "id, teacher_id, title, amount, min_student, max_student, \
     current_student, start_date, end_date, deadline, status, created_at, updated_at";

pub(super) const ENROLLMENT_COLUMNS: &str = "id, lesson_id, student_id, status, enrolled_at, \
     canceled_at, refund_requested_at, refunded_at";

pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} in database: {}", what, err),
    )
}

fn count(row: &PgRow, column: &'static str) -> Result<u32, DomainError> {
    let value: i32 = row.try_get(column).map_err(db_error("Failed to read lesson"))?;
    u32::try_from(value).map_err(|e| corrupt(column, e))
}

/// Converts a head-count field for binding.
pub(super) fn to_db_count(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|e| corrupt("student count", e))
}

pub(super) fn lesson_from_row(row: &PgRow) -> Result<Lesson, DomainError> {
    let id: Uuid = row.try_get("id").map_err(db_error("Failed to read lesson"))?;
    let teacher_id: String = row.try_get("teacher_id").map_err(db_error("Failed to read lesson"))?;
    let title: String = row.try_get("title").map_err(db_error("Failed to read lesson"))?;
    let amount: i64 = row.try_get("amount").map_err(db_error("Failed to read lesson"))?;
    let start_date: NaiveDate = row.try_get("start_date").map_err(db_error("Failed to read lesson"))?;
    let end_date: NaiveDate = row.try_get("end_date").map_err(db_error("Failed to read lesson"))?;
    let deadline: NaiveDate = row.try_get("deadline").map_err(db_error("Failed to read lesson"))?;
    let status: String = row.try_get("status").map_err(db_error("Failed to read lesson"))?;
    let created_at: DateTime<Utc> =
        row.try_get("created_at").map_err(db_error("Failed to read lesson"))?;
    let updated_at: DateTime<Utc> =
        row.try_get("updated_at").map_err(db_error("Failed to read lesson"))?;

    let snapshot = LessonSnapshot {
        id: LessonId::from_uuid(id),
        teacher_id: UserId::new(teacher_id).map_err(|e| corrupt("teacher_id", e))?,
        title,
        amount,
        min_student: count(row, "min_student")?,
        max_student: count(row, "max_student")?,
        current_student: count(row, "current_student")?,
        start_date,
        end_date,
        deadline,
        status: status
            .parse::<LessonStatus>()
            .map_err(|e| corrupt("lesson status", e))?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    };

    Lesson::reconstitute(snapshot).map_err(|e| corrupt("lesson", e))
}

pub(super) fn enrollment_from_row(row: &PgRow) -> Result<Enrollment, DomainError> {
    let id: Uuid = row.try_get("id").map_err(db_error("Failed to read enrollment"))?;
    let lesson_id: Uuid = row.try_get("lesson_id").map_err(db_error("Failed to read enrollment"))?;
    let student_id: String =
        row.try_get("student_id").map_err(db_error("Failed to read enrollment"))?;
    let status: String = row.try_get("status").map_err(db_error("Failed to read enrollment"))?;
    let enrolled_at: DateTime<Utc> =
        row.try_get("enrolled_at").map_err(db_error("Failed to read enrollment"))?;
    let canceled_at: Option<DateTime<Utc>> =
        row.try_get("canceled_at").map_err(db_error("Failed to read enrollment"))?;
    let refund_requested_at: Option<DateTime<Utc>> = row
        .try_get("refund_requested_at")
        .map_err(db_error("Failed to read enrollment"))?;
    let refunded_at: Option<DateTime<Utc>> =
        row.try_get("refunded_at").map_err(db_error("Failed to read enrollment"))?;

    let snapshot = EnrollmentSnapshot {
        id: EnrollmentId::from_uuid(id),
        lesson_id: LessonId::from_uuid(lesson_id),
        student_id: UserId::new(student_id).map_err(|e| corrupt("student_id", e))?,
        status: status
            .parse::<EnrollmentStatus>()
            .map_err(|e| corrupt("enrollment status", e))?,
        enrolled_at: Timestamp::from_datetime(enrolled_at),
        canceled_at: canceled_at.map(Timestamp::from_datetime),
        refund_requested_at: refund_requested_at.map(Timestamp::from_datetime),
        refunded_at: refunded_at.map(Timestamp::from_datetime),
    };

    Enrollment::reconstitute(snapshot).map_err(|e| corrupt("enrollment", e))
}
