//! Enrollment domain events.
//!
//! The settlement collaborator listens for `Canceled`, `RefundRequested` and
//! `Refunded` to move money.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainEvent, EnrollmentId, LessonId, Timestamp, UserId};

/// Events that occur during the enrollment lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnrollmentEvent {
    /// A student took a seat.
    Enrolled {
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        student_id: UserId,
        /// Head count after this enrollment.
        current_student: u32,
        occurred_at: Timestamp,
    },

    /// Canceled before the deadline; the student gets a full refund.
    Canceled {
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        student_id: UserId,
        occurred_at: Timestamp,
    },

    /// Refund requested after the deadline; awaits settlement review.
    RefundRequested {
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        student_id: UserId,
        occurred_at: Timestamp,
    },

    /// Settlement approved the refund.
    Refunded {
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        student_id: UserId,
        occurred_at: Timestamp,
    },
}

impl EnrollmentEvent {
    pub fn enrollment_id(&self) -> EnrollmentId {
        match self {
            EnrollmentEvent::Enrolled { enrollment_id, .. }
            | EnrollmentEvent::Canceled { enrollment_id, .. }
            | EnrollmentEvent::RefundRequested { enrollment_id, .. }
            | EnrollmentEvent::Refunded { enrollment_id, .. } => *enrollment_id,
        }
    }

    pub fn student_id(&self) -> &UserId {
        match self {
            EnrollmentEvent::Enrolled { student_id, .. }
            | EnrollmentEvent::Canceled { student_id, .. }
            | EnrollmentEvent::RefundRequested { student_id, .. }
            | EnrollmentEvent::Refunded { student_id, .. } => student_id,
        }
    }
}

impl DomainEvent for EnrollmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            EnrollmentEvent::Enrolled { .. } => "enrollment.enrolled.v1",
            EnrollmentEvent::Canceled { .. } => "enrollment.canceled.v1",
            EnrollmentEvent::RefundRequested { .. } => "enrollment.refund_requested.v1",
            EnrollmentEvent::Refunded { .. } => "enrollment.refunded.v1",
        }
    }

    fn aggregate_id(&self) -> String {
        self.enrollment_id().to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Enrollment"
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            EnrollmentEvent::Enrolled { occurred_at, .. }
            | EnrollmentEvent::Canceled { occurred_at, .. }
            | EnrollmentEvent::RefundRequested { occurred_at, .. }
            | EnrollmentEvent::Refunded { occurred_at, .. } => *occurred_at,
        }
    }
}
