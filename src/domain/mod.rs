//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `pricing` - Group-buying price calculation
//! - `schedule` - Recruiting deadline and cancellation window
//! - `lesson` - Lesson aggregate and its recruiting lifecycle
//! - `enrollment` - Enrollment entity and its cancel/refund lifecycle
//! - `roster` - A lesson plus its enrollments, the unit of serialization

pub mod enrollment;
pub mod foundation;
pub mod lesson;
pub mod pricing;
pub mod roster;
pub mod schedule;
