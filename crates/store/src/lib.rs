//! Storage backends for persisting session credentials.
//!
//! Provides an in-memory store for testing and a SQLite-backed store for production.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;
