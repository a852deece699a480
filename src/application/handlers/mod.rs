//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod enrollment;
pub mod lesson;
pub(crate) mod support;

pub use enrollment::*;
pub use lesson::*;
