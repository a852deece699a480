//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait, event
//! plumbing and error types that form the vocabulary of the engine.

mod errors;
mod events;
mod ids;
mod percentage;
mod role;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent};
pub use ids::{EnrollmentId, LessonId, UserId};
pub use percentage::Percentage;
pub use role::ActorRole;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
