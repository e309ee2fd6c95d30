//! The generic upsert-by-key executor.
//!
//! A seed row is planned into an [`Upsert`]: which table, which columns
//! identify the row, and which columns carry data. Executing the plan looks
//! the key up and then inserts, updates, or leaves the row alone.

use mosque_core::{MosqueAware, MosqueId};
use rusqlite::{Connection, OptionalExtension as _, types::Value};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Insert when absent, otherwise overwrite every non-key column.
  Upsert,
  /// Insert when absent, otherwise leave the row as it is.
  InsertIfAbsent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Inserted,
  Updated,
  /// The key existed and every column already held the planned value.
  Unchanged,
}

/// A planned write of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
  pub table:     &'static str,
  pub mode:      Mode,
  pub key:       Vec<(&'static str, Value)>,
  pub fields:    Vec<(&'static str, Value)>,
  /// Columns set to the run timestamp on insert only.
  pub created:   &'static [&'static str],
  /// Columns set to the run timestamp on insert and on every real update.
  pub updated:   &'static [&'static str],
  /// Whether the table carries a `mosque_id` column.
  pub tenant:    bool,
  pub mosque_id: Option<MosqueId>,
}

impl Upsert {
  pub fn new(table: &'static str, mode: Mode) -> Self {
    Self {
      table,
      mode,
      key: Vec::new(),
      fields: Vec::new(),
      created: &[],
      updated: &[],
      tenant: false,
      mosque_id: None,
    }
  }

  pub fn key(mut self, column: &'static str, value: Value) -> Self {
    self.key.push((column, value));
    self
  }

  pub fn field(mut self, column: &'static str, value: Value) -> Self {
    self.fields.push((column, value));
    self
  }

  /// Mark the table as tenant-scoped, with the row's explicit mosque if any.
  pub fn tenant(mut self, mosque_id: Option<MosqueId>) -> Self {
    self.tenant = true;
    self.mosque_id = mosque_id;
    self
  }

  pub fn timestamps(
    mut self,
    created: &'static [&'static str],
    updated: &'static [&'static str],
  ) -> Self {
    self.created = created;
    self.updated = updated;
    self
  }

  /// Data columns written on insert and update, tenant column included.
  fn data(&self) -> Vec<(&'static str, Value)> {
    let mut data = self.fields.clone();
    if let Some(id) = self.mosque_id.filter(|_| self.tenant) {
      data.push(("mosque_id", Value::Integer(id.0)));
    }
    data
  }

  /// Feed a canonical rendering of the plan into `hasher`. Timestamps are
  /// not part of it, so the same plan always digests the same way.
  pub fn digest_into(&self, hasher: &mut Sha256) {
    hasher.update(self.table.as_bytes());
    hasher.update(match self.mode {
      Mode::Upsert => b"|U".as_slice(),
      Mode::InsertIfAbsent => b"|I".as_slice(),
    });
    for (marker, columns) in [(b"|k", &self.key), (b"|f", &self.data())] {
      hasher.update(marker);
      for (column, value) in columns.iter() {
        hasher.update(column.as_bytes());
        hasher.update(b"=");
        digest_value(hasher, value);
        hasher.update(b";");
      }
    }
    hasher.update(b"\n");
  }
}

impl MosqueAware for Upsert {
  fn mosque_id(&self) -> Option<MosqueId> { self.mosque_id }

  fn set_mosque_id(&mut self, id: MosqueId) {
    if self.tenant {
      self.mosque_id = Some(id);
    }
  }
}

fn digest_value(hasher: &mut Sha256, value: &Value) {
  match value {
    Value::Null => hasher.update(b"N"),
    Value::Integer(n) => hasher.update(format!("I{n}")),
    Value::Real(f) => hasher.update(format!("R{f}")),
    Value::Text(s) => hasher.update(format!("T{}:{s}", s.len())),
    Value::Blob(b) => hasher.update(format!("B{}", hex::encode(b))),
  }
}

/// Execute `plan` against `conn`, stamping timestamp columns with `now`.
pub fn execute(conn: &Connection, plan: &Upsert, now: &str) -> Result<Outcome> {
  if let Some((column, _)) = plan.key.iter().find(|(_, v)| *v == Value::Null) {
    return Err(Error::NullKey { table: plan.table, column: *column });
  }

  let key_clause = plan
    .key
    .iter()
    .enumerate()
    .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(" AND ");
  let key_values = plan.key.iter().map(|(_, v)| v);

  let exists = conn
    .query_row(
      &format!("SELECT 1 FROM {} WHERE {key_clause}", plan.table),
      rusqlite::params_from_iter(key_values),
      |_| Ok(()),
    )
    .optional()?
    .is_some();

  match (exists, plan.mode) {
    (false, _) => insert(conn, plan, now).map(|()| Outcome::Inserted),
    (true, Mode::InsertIfAbsent) => Ok(Outcome::Unchanged),
    (true, Mode::Upsert) => update(conn, plan, &key_clause, now),
  }
}

fn insert(conn: &Connection, plan: &Upsert, now: &str) -> Result<()> {
  let now = Value::Text(now.to_owned());
  let mut columns: Vec<&str> = Vec::new();
  let mut values: Vec<Value> = Vec::new();
  for (column, value) in plan.key.iter().chain(plan.data().iter()) {
    columns.push(column);
    values.push(value.clone());
  }
  for column in plan.created.iter().chain(plan.updated) {
    columns.push(column);
    values.push(now.clone());
  }

  let placeholders = (1..=values.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  conn.execute(
    &format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      plan.table,
      columns.join(", ")
    ),
    rusqlite::params_from_iter(values),
  )?;
  Ok(())
}

/// Overwrite the data columns, but only if at least one of them differs.
fn update(
  conn: &Connection,
  plan: &Upsert,
  key_clause: &str,
  now: &str,
) -> Result<Outcome> {
  let data = plan.data();
  if data.is_empty() {
    return Ok(Outcome::Unchanged);
  }

  // Key parameters come first so `key_clause` can be reused verbatim.
  let mut values: Vec<Value> = plan.key.iter().map(|(_, v)| v.clone()).collect();
  let mut assignments = Vec::new();
  let mut unchanged = Vec::new();
  for (column, value) in data {
    values.push(value);
    let n = values.len();
    assignments.push(format!("{column} = ?{n}"));
    unchanged.push(format!("{column} IS ?{n}"));
  }
  for column in plan.updated {
    values.push(Value::Text(now.to_owned()));
    assignments.push(format!("{column} = ?{}", values.len()));
  }

  let changed = conn.execute(
    &format!(
      "UPDATE {} SET {} WHERE {key_clause} AND NOT ({})",
      plan.table,
      assignments.join(", "),
      unchanged.join(" AND ")
    ),
    rusqlite::params_from_iter(values),
  )?;
  Ok(if changed == 0 { Outcome::Unchanged } else { Outcome::Updated })
}
