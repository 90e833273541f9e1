//! Session-scoped in-memory storage backend.
//!
//! Each browser session owns its own set of lists. Nothing is persisted and
//! all data is lost when the process stops.

mod repository;

pub use repository::{SessionProvider, SessionStore};
