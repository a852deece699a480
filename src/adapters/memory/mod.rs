//! In-memory storage adapters, used for local runs and tests.

mod roster_store;

pub use roster_store::InMemoryRosterStore;
