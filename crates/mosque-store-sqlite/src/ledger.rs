//! The `applied_changesets` ledger.
//!
//! These functions take a plain [`rusqlite::Connection`] (or a transaction,
//! which derefs to one) so the migration runner can record a changeset in
//! the same transaction as its rows.

use mosque_core::store::AppliedChangeset;
use rusqlite::{Connection, OptionalExtension as _};

use crate::encode::encode_dt;

/// The recorded checksum of changeset `id`, if it has been applied.
pub fn applied_checksum(
  conn: &Connection,
  id: &str,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT checksum FROM applied_changesets WHERE id = ?1",
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()
}

/// Insert or refresh the ledger entry for a changeset.
pub fn record(conn: &Connection, entry: &AppliedChangeset) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO applied_changesets (id, author, checksum, applied_at, row_count)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT (id) DO UPDATE SET
       author     = excluded.author,
       checksum   = excluded.checksum,
       applied_at = excluded.applied_at,
       row_count  = excluded.row_count",
    rusqlite::params![
      entry.id,
      entry.author,
      entry.checksum,
      encode_dt(entry.applied_at),
      entry.row_count,
    ],
  )?;
  Ok(())
}
