//! Lesson domain module.
//!
//! Handles lesson authoring, recruiting status and the enrolled head count.
//!
//! # Module Structure
//!
//! - `aggregate` - Lesson aggregate entity
//! - `status` - LessonStatus state machine
//! - `terms` - Teacher-editable fields and their validation
//! - `events` - Lesson domain events
//! - `errors` - Lesson-specific errors

mod aggregate;
mod errors;
mod events;
mod status;
mod terms;

pub use aggregate::{CapacityChange, CapacityDelta, Lesson, LessonSnapshot};
pub use errors::LessonError;
pub use events::LessonEvent;
pub use status::LessonStatus;
pub use terms::{LessonTerms, MAX_TITLE_LENGTH};
