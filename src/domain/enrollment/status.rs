//! Enrollment status state machine.
//!
//! ```text
//! ENROLLED ──► CANCELED                 (before the deadline)
//!     │
//!     └──────► REFUND_REQUESTED ──► REFUNDED   (after the deadline)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Status of one student's seat in a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Holding a seat.
    Enrolled,

    /// Freely canceled before the deadline. Terminal.
    Canceled,

    /// Seat released after the deadline; waiting for settlement.
    RefundRequested,

    /// Settlement approved the refund. Terminal.
    Refunded,
}

impl EnrollmentStatus {
    /// True if the enrollment counts toward the lesson head count.
    pub fn holds_seat(&self) -> bool {
        matches!(self, EnrollmentStatus::Enrolled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "ENROLLED",
            EnrollmentStatus::Canceled => "CANCELED",
            EnrollmentStatus::RefundRequested => "REFUND_REQUESTED",
            EnrollmentStatus::Refunded => "REFUNDED",
        }
    }
}

impl StateMachine for EnrollmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, target),
            (Enrolled, Canceled) | (Enrolled, RefundRequested) | (RefundRequested, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EnrollmentStatus::*;
        match self {
            Enrolled => vec![Canceled, RefundRequested],
            RefundRequested => vec![Refunded],
            Canceled | Refunded => vec![],
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ENROLLED" => Ok(EnrollmentStatus::Enrolled),
            "CANCELED" | "CANCELLED" => Ok(EnrollmentStatus::Canceled),
            "REFUND_REQUESTED" => Ok(EnrollmentStatus::RefundRequested),
            "REFUNDED" => Ok(EnrollmentStatus::Refunded),
            other => Err(ValidationError::invalid_format(
                "enrollment_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}
