//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `clock` - System and fixed clocks
//! - `memory` - In-process roster store
//! - `postgres` - PostgreSQL roster store
//! - `events` - Event publishers (logging, in-memory)
//! - `http` - REST API

pub mod clock;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use clock::{FixedClock, SystemClock};
pub use events::{InMemoryEventBus, LoggingEventPublisher};
pub use memory::InMemoryRosterStore;
pub use postgres::{PostgresRosterReader, PostgresRosterRepository};
