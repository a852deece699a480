//! Roster module - a lesson and its enrollments as one consistency unit.

mod aggregate;
mod events;

pub use aggregate::Roster;
pub use events::RosterEvent;
