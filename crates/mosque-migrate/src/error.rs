//! Error type for `mosque-migrate`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[from] mosque_store_sqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("changelog parse error: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("cannot read changelog {path}: {source}")]
  Io {
    path:   String,
    source: std::io::Error,
  },

  #[error("missing required field `{0}`")]
  MissingField(&'static str),

  /// A field value could not be coerced to its column type.
  #[error("field `{field}`: {value:?} is not {expected}")]
  Coerce {
    field:    &'static str,
    value:    String,
    expected: String,
  },

  #[error("key column `{table}.{column}` is NULL")]
  NullKey {
    table:  &'static str,
    column: &'static str,
  },

  #[error("duplicate changeset id {0:?}")]
  DuplicateChangeset(String),

  /// An applied changeset was edited after the fact.
  #[error(
    "changeset {id:?} was applied with checksum {recorded} but now plans to \
     {planned}; set run_on_change to re-apply it"
  )]
  ChecksumMismatch {
    id:       String,
    recorded: String,
    planned:  String,
  },

  #[error("changeset {changeset:?}, row {index} ({kind}): {source}")]
  Row {
    changeset: String,
    index:     usize,
    kind:      &'static str,
    source:    Box<Error>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
