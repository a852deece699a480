//! Lesson status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Recruiting status of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    /// Recruiting; accepts new enrollments while seats remain.
    Active,

    /// Recruiting ended (roster full or closed by the teacher).
    /// Enrolled students still attend.
    Closed,

    /// Lesson called off. Terminal.
    Canceled,
}

impl LessonStatus {
    /// Returns true if new students may join.
    pub fn accepts_enrollments(&self) -> bool {
        matches!(self, LessonStatus::Active)
    }

    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Active => "ACTIVE",
            LessonStatus::Closed => "CLOSED",
            LessonStatus::Canceled => "CANCELED",
        }
    }
}

impl StateMachine for LessonStatus {
    fn can_transition_to(&self, _target: &Self) -> bool {
        // Teachers may move freely among the three states until the lesson
        // is canceled; nothing leaves Canceled.
        !matches!(self, LessonStatus::Canceled)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LessonStatus::*;
        match self {
            Active | Closed => vec![Active, Closed, Canceled],
            Canceled => vec![],
        }
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(LessonStatus::Active),
            "CLOSED" => Ok(LessonStatus::Closed),
            "CANCELED" | "CANCELLED" => Ok(LessonStatus::Canceled),
            other => Err(ValidationError::invalid_format(
                "lesson_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LessonStatus; 3] = [
        LessonStatus::Active,
        LessonStatus::Closed,
        LessonStatus::Canceled,
    ];

    #[test]
    fn active_and_closed_reach_every_state() {
        for from in [LessonStatus::Active, LessonStatus::Closed] {
            for to in ALL {
                assert_eq!(from.transition_to(to), Ok(to));
            }
        }
    }

    #[test]
    fn canceled_is_terminal() {
        assert!(LessonStatus::Canceled.is_terminal());
        for to in ALL {
            assert!(LessonStatus::Canceled.transition_to(to).is_err());
        }
    }

    #[test]
    fn only_active_accepts_enrollments() {
        assert!(LessonStatus::Active.accepts_enrollments());
        assert!(!LessonStatus::Closed.accepts_enrollments());
        assert!(!LessonStatus::Canceled.accepts_enrollments());
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in ALL {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn serializes_in_upper_case() {
        assert_eq!(serde_json::to_string(&LessonStatus::Closed).unwrap(), "\"CLOSED\"");
        let parsed: LessonStatus = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(parsed, LessonStatus::Canceled);
    }

    #[test]
    fn parses_storage_strings() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<LessonStatus>(), Ok(status));
        }
        assert!("PAUSED".parse::<LessonStatus>().is_err());
    }
}
