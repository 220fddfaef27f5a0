//! Error types for `pitchside-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("fixture not found: {0}")]
  FixtureNotFound(i64),

  #[error("team not found: {0}")]
  TeamNotFound(i64),

  #[error("player not found: {0}")]
  PlayerNotFound(i64),

  #[error("unknown half marker: {0:?}")]
  UnknownHalf(String),

  #[error("unknown side: {0:?}")]
  UnknownSide(String),

  #[error("unknown game state: {0:?}")]
  UnknownGameState(String),

  #[error("unknown incident type: {0:?}")]
  UnknownIncidentType(String),

  #[error("unknown result marker: {0:?}")]
  UnknownResult(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
