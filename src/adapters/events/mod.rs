//! Event publisher adapters.
//!
//! - `InMemoryEventBus` - Captures events for test assertions
//! - `LoggingEventPublisher` - Writes events to the structured log

mod in_memory;
mod logging;

pub use in_memory::InMemoryEventBus;
pub use logging::LoggingEventPublisher;
