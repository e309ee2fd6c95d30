//! Changelog files: an ordered list of changesets, each a batch of seed rows.

use std::{collections::HashSet, path::Path};

use mosque_core::MosqueId;
use serde::Deserialize;

use crate::{Error, Result, seed::SeedRow};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Changelog {
  #[serde(rename = "changeset", default)]
  pub changesets: Vec<Changeset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Changeset {
  /// Unique across the changelog; also the ledger key.
  pub id:            String,
  pub author:        Option<String>,
  /// Tenant used to stamp rows of tenant tables that do not name one.
  pub mosque_id:     Option<MosqueId>,
  /// Re-apply when the planned rows changed since the last run, instead of
  /// failing.
  #[serde(default)]
  pub run_on_change: bool,
  #[serde(default)]
  pub rows:          Vec<SeedRow>,
}

impl Changelog {
  pub fn parse(source: &str) -> Result<Self> {
    let changelog: Self = toml::from_str(source)?;
    let mut seen = HashSet::new();
    for changeset in &changelog.changesets {
      if !seen.insert(changeset.id.as_str()) {
        return Err(Error::DuplicateChangeset(changeset.id.clone()));
      }
    }
    Ok(changelog)
  }

  pub fn load(path: &Path) -> Result<Self> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::parse(&source)
  }
}
