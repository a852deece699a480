//! HTTP DTOs for enrollment endpoints.

use serde::Serialize;

use crate::domain::enrollment::{Enrollment, EnrollmentStatus};
use crate::domain::foundation::Timestamp;

fn rfc3339(ts: Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

/// One student's seat.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub lesson_id: String,
    pub student_id: String,
    pub status: EnrollmentStatus,
    pub enrolled_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_requested_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_at: Option<String>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id().to_string(),
            lesson_id: enrollment.lesson_id().to_string(),
            student_id: enrollment.student_id().to_string(),
            status: enrollment.status(),
            enrolled_at: rfc3339(enrollment.enrolled_at()),
            canceled_at: enrollment.canceled_at().map(rfc3339),
            refund_requested_at: enrollment.refund_requested_at().map(rfc3339),
            refunded_at: enrollment.refunded_at().map(rfc3339),
        }
    }
}

/// Response of `POST /lessons/:id/enrollments`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub enrollment_id: String,
    pub current_student: u32,
}

/// A lesson's roster.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentResponse>,
    pub total: usize,
}

impl From<Vec<Enrollment>> for EnrollmentListResponse {
    fn from(enrollments: Vec<Enrollment>) -> Self {
        Self {
            total: enrollments.len(),
            items: enrollments.into_iter().map(Into::into).collect(),
        }
    }
}
