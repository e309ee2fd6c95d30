//! Error type for `mosque-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] mosque_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// Raised inside a [`SqliteStore::transaction`](crate::SqliteStore::transaction)
  /// closure.
  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("decimal parse error: {0}")]
  DecimalParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
