//! Lesson domain events.
//!
//! Emitted after a lesson change has been committed. Consumers use them for
//! audit logging and to notify enrolled students.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainEvent, LessonId, Timestamp, UserId};

use super::LessonStatus;

/// Events that occur during the lesson lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LessonEvent {
    /// A teacher opened a new lesson for recruiting.
    Created {
        lesson_id: LessonId,
        teacher_id: UserId,
        title: String,
        amount: i64,
        max_student: u32,
        occurred_at: Timestamp,
    },

    /// A teacher edited the lesson terms.
    Updated {
        lesson_id: LessonId,
        teacher_id: UserId,
        occurred_at: Timestamp,
    },

    /// The recruiting status changed.
    ///
    /// `automatic` is true when the change came from the last seat being
    /// filled rather than from the teacher.
    StatusChanged {
        lesson_id: LessonId,
        from: LessonStatus,
        to: LessonStatus,
        automatic: bool,
        occurred_at: Timestamp,
    },
}

impl LessonEvent {
    pub fn lesson_id(&self) -> LessonId {
        match self {
            LessonEvent::Created { lesson_id, .. }
            | LessonEvent::Updated { lesson_id, .. }
            | LessonEvent::StatusChanged { lesson_id, .. } => *lesson_id,
        }
    }
}

impl DomainEvent for LessonEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LessonEvent::Created { .. } => "lesson.created.v1",
            LessonEvent::Updated { .. } => "lesson.updated.v1",
            LessonEvent::StatusChanged { .. } => "lesson.status_changed.v1",
        }
    }

    fn aggregate_id(&self) -> String {
        self.lesson_id().to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Lesson"
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            LessonEvent::Created { occurred_at, .. }
            | LessonEvent::Updated { occurred_at, .. }
            | LessonEvent::StatusChanged { occurred_at, .. } => *occurred_at,
        }
    }
}
