//! Events collected by a roster while a session is open.

use crate::domain::enrollment::EnrollmentEvent;
use crate::domain::foundation::{DomainError, EventEnvelope, SerializableDomainEvent};
use crate::domain::lesson::LessonEvent;

/// Any event raised by a roster operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    Lesson(LessonEvent),
    Enrollment(EnrollmentEvent),
}

impl RosterEvent {
    pub fn event_type(&self) -> &'static str {
        use crate::domain::foundation::DomainEvent;
        match self {
            RosterEvent::Lesson(e) => e.event_type(),
            RosterEvent::Enrollment(e) => e.event_type(),
        }
    }

    pub fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        match self {
            RosterEvent::Lesson(e) => e.to_envelope(),
            RosterEvent::Enrollment(e) => e.to_envelope(),
        }
    }
}

impl From<LessonEvent> for RosterEvent {
    fn from(event: LessonEvent) -> Self {
        RosterEvent::Lesson(event)
    }
}

impl From<EnrollmentEvent> for RosterEvent {
    fn from(event: EnrollmentEvent) -> Self {
        RosterEvent::Enrollment(event)
    }
}
