//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Clock` - Current time
//! - `RosterRepository` / `RosterSession` - Exclusive per-lesson writes
//! - `RosterReader` - Committed-state queries
//! - `EventPublisher` - Domain event delivery to collaborators

mod clock;
mod event_publisher;
mod roster_reader;
mod roster_repository;

pub use clock::Clock;
pub use event_publisher::EventPublisher;
pub use roster_reader::RosterReader;
pub use roster_repository::{RosterRepository, RosterSession};
