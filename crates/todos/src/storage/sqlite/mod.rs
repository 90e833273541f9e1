//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the `Storage` trait
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.

mod conversions;
mod error;
mod provider;
mod repository;
mod schema;

pub use provider::SqliteProvider;
pub use repository::SqliteStorage;
