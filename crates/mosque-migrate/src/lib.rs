//! Seed migrations for the mosque registry.
//!
//! A TOML [`Changelog`] lists changesets of loosely-typed seed rows. Each
//! row is coerced into an upsert-by-key plan ([`upsert::Upsert`]), stamped
//! with a tenant where needed, and applied by [`runner::run`] inside one
//! transaction per changeset. Applied changesets are recorded with a
//! checksum so re-running a changelog only applies what is new.

pub mod changelog;
pub mod coerce;
pub mod error;
pub mod loose;
pub mod report;
pub mod runner;
pub mod seed;
pub mod upsert;

pub use changelog::{Changelog, Changeset};
pub use error::{Error, Result};
pub use report::{RoleDump, RunReport};

use std::path::PathBuf;

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `MOSQUE_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct MigrateConfig {
  pub store_path: PathBuf,
  #[serde(default = "default_changelog")]
  pub changelog:  PathBuf,
  /// Tenant for rows that name none. Unset runs as super administrator.
  #[serde(default)]
  pub mosque_id:  Option<i64>,
}

fn default_changelog() -> PathBuf { PathBuf::from("changelog.toml") }

#[cfg(test)]
mod tests;
