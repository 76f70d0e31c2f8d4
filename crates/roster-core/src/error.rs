//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed legacy snapshot: {0}")]
  Snapshot(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
