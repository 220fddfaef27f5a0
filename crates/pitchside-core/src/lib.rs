//! Core types and trait definitions for the Pitchside match warehouse.
//!
//! This crate is deliberately free of database and I/O dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! Identifiers are the upstream feed's stable integer IDs (`fixture_id`,
//! `team_id`, `player_id`, ...). The storage surrogate `id` each row also
//! carries never participates in cross-entity joins.

pub mod dimension;
pub mod error;
pub mod event;
pub mod fixture;
pub mod state;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
