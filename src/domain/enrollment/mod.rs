//! Enrollment domain module.
//!
//! One student's seat in a lesson and the cancel/refund paths out of it.
//!
//! # Module Structure
//!
//! - `aggregate` - Enrollment entity
//! - `status` - EnrollmentStatus state machine
//! - `events` - Enrollment domain events
//! - `errors` - Enrollment-specific errors

mod aggregate;
mod errors;
mod events;
mod status;

pub use aggregate::{Enrollment, EnrollmentSnapshot};
pub use errors::EnrollmentError;
pub use events::EnrollmentEvent;
pub use status::EnrollmentStatus;
