//! HTTP DTOs for lesson endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::handlers::LessonView;
use crate::domain::lesson::{LessonStatus, LessonTerms};
use crate::domain::pricing::PriceQuote;
use crate::domain::schedule::CancellationWindow;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /lessons` and `PATCH /lessons/:id`.
///
/// Edits replace every teacher-editable field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonTermsRequest {
    pub title: String,
    pub amount: i64,
    pub min_student: u32,
    pub max_student: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<LessonTermsRequest> for LessonTerms {
    fn from(req: LessonTermsRequest) -> Self {
        Self {
            title: req.title,
            amount: req.amount,
            min_student: req.min_student,
            max_student: req.max_student,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Body of `PATCH /lessons/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetLessonStatusRequest {
    pub status: LessonStatus,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub per_student: i64,
    pub discount_rate_percent: u8,
}

impl From<PriceQuote> for PricingResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            per_student: quote.per_student,
            discount_rate_percent: quote.discount_rate.value(),
        }
    }
}

/// Lesson with its derived values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: String,
    pub teacher_id: String,
    pub title: String,
    pub amount: i64,
    pub min_student: u32,
    pub max_student: u32,
    pub current_student: u32,
    pub remaining_seats: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub deadline: NaiveDate,
    pub status: LessonStatus,
    pub cancellation_window: CancellationWindow,
    pub pricing: PricingResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<LessonView> for LessonResponse {
    fn from(view: LessonView) -> Self {
        let lesson = view.lesson;
        Self {
            id: lesson.id().to_string(),
            teacher_id: lesson.teacher_id().to_string(),
            title: lesson.title().to_string(),
            amount: lesson.amount(),
            min_student: lesson.min_student(),
            max_student: lesson.max_student(),
            current_student: lesson.current_student(),
            remaining_seats: view.remaining_seats,
            start_date: lesson.start_date(),
            end_date: lesson.end_date(),
            deadline: lesson.deadline(),
            status: lesson.status(),
            cancellation_window: view.cancellation_window,
            pricing: view.pricing.into(),
            created_at: lesson.created_at().as_datetime().to_rfc3339(),
            updated_at: lesson.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a status change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStatusResponse {
    pub lesson_id: String,
    pub previous: LessonStatus,
    pub status: LessonStatus,
}
