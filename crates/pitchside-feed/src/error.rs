use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed feed payload: {0}")]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Core(#[from] pitchside_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
