//! SQLite backend for the Pitchside match warehouse.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. The schema in [`schema`] is the
//! warehouse's real contract: cascade and SET NULL rules, uniqueness of the
//! external keys, and the `(fixture_id, period, key)` /
//! `(fixture_id, player_id)` statistics constraints are all enforced here by
//! the engine, not in application code.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
