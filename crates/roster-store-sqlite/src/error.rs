//! Error type for `roster-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("unreadable legacy snapshot {path}: {source}")]
  Snapshot {
    path:   PathBuf,
    #[source]
    source: roster_core::Error,
  },

  /// A player row was read back without any faction history.
  #[error("player {0} has no faction history")]
  MissingHistory(i64),

  #[error("faction {0} is not known to this tenant")]
  UnknownFaction(i64),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
