//! Functional core for the todos app.
//!
//! Holds the domain types, the pure validation and ordering rules, and the
//! [`storage::Storage`] contract that every persistence backend implements.
//! Nothing in this crate performs I/O.

pub mod storage;
pub mod todo;
