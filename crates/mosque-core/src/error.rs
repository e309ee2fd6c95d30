//! Error types for `mosque-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid mosque id: {0:?}")]
  InvalidMosqueId(String),

  /// A string did not match any declared value of a fixed enumeration.
  #[error("unknown {kind} value: {value:?}")]
  UnknownValue { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
