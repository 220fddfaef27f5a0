//! Mapping from upstream feed payloads into `pitchside-core` row types.
//!
//! Each module covers one payload shape: round event pages, per-fixture
//! incident lists, lineups, shotmaps, statistics blocks and manager pairs.
//! Parsing is tolerant the way the feed demands: optional fields stay
//! optional, unknown keys are ignored, and generic incidents keep their full
//! raw JSON alongside the typed columns.

mod error;
pub mod events;
pub mod incidents;
pub mod lineups;
pub mod managers;
pub mod norm;
pub mod shotmap;
pub mod statistics;

pub use error::{Error, Result};
