//! Persistence layer for the route store.
//!
//! SQLite holds the durable copy of every route; `AppState` keeps an in-memory
//! cache in front of it and writes through on insert.

pub mod db;
pub mod routes;

pub use db::{init_database, Database};
