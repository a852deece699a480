//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresRosterRepository` - Per-lesson locked write sessions
//! - `PostgresRosterReader` - Committed-state queries
//!
//! Schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod roster_reader;
mod roster_repository;
mod rows;

pub use roster_reader::PostgresRosterReader;
pub use roster_repository::PostgresRosterRepository;
