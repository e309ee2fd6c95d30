//! Applies a changelog to a store.
//!
//! Changesets run in order, each in its own transaction. A changeset whose
//! checksum is already in the ledger is skipped. The first failure rolls
//! back its changeset and ends the run; changesets before it stay applied.

use chrono::Utc;
use mosque_core::{TenantScope, store::AppliedChangeset};
use mosque_store_sqlite::{SqliteStore, ledger};
use sha2::{Digest, Sha256};

use crate::{
  Error, Result,
  changelog::{Changelog, Changeset},
  report::{ChangesetReport, RunReport, Status},
  upsert::{self, Upsert},
};

/// Apply every changeset in `changelog`.
///
/// `scope` supplies the tenant for rows that name none when the changeset
/// does not set its own `mosque_id`.
pub async fn run(
  store: &SqliteStore,
  changelog: &Changelog,
  scope: TenantScope,
) -> Result<RunReport> {
  let mut report = RunReport::default();
  for changeset in &changelog.changesets {
    let outcome = apply(store, changeset, scope).await?;
    match outcome.status {
      Status::Skipped => {
        tracing::info!(changeset = %outcome.id, "already applied, skipping")
      }
      status => tracing::info!(
        changeset = %outcome.id,
        %status,
        inserted = outcome.inserted,
        updated = outcome.updated,
        unchanged = outcome.unchanged,
        "changeset done"
      ),
    }
    report.changesets.push(outcome);
  }
  Ok(report)
}

/// Coerce and stamp every row of a changeset. Nothing is written.
pub fn plan(changeset: &Changeset, scope: TenantScope) -> Result<Vec<Upsert>> {
  let stamp = TenantScope::from(changeset.mosque_id.or(scope.mosque_id()));
  changeset
    .rows
    .iter()
    .enumerate()
    .map(|(index, row)| {
      let mut plan = row.plan().map_err(|e| row_error(changeset, index, row.kind(), e))?;
      if stamp.stamp(&mut plan) {
        tracing::debug!(
          changeset = %changeset.id,
          index,
          table = plan.table,
          mosque_id = ?plan.mosque_id,
          "stamped tenant"
        );
      }
      Ok(plan)
    })
    .collect()
}

/// Hex SHA-256 over the planned rows, in order.
pub fn checksum(plans: &[Upsert]) -> String {
  let mut hasher = Sha256::new();
  for plan in plans {
    plan.digest_into(&mut hasher);
  }
  hex::encode(hasher.finalize())
}

fn row_error(changeset: &Changeset, index: usize, kind: &'static str, e: Error) -> Error {
  Error::Row {
    changeset: changeset.id.clone(),
    index,
    kind,
    source: Box::new(e),
  }
}

async fn apply(
  store: &SqliteStore,
  changeset: &Changeset,
  scope: TenantScope,
) -> Result<ChangesetReport> {
  let plans = plan(changeset, scope)?;
  let checksum = checksum(&plans);
  let kinds: Vec<&'static str> = changeset.rows.iter().map(|r| r.kind()).collect();
  let id = changeset.id.clone();
  let author = changeset.author.clone();
  let run_on_change = changeset.run_on_change;

  store
    .transaction(move |tx| {
      let status = match ledger::applied_checksum(tx, &id)? {
        Some(recorded) if recorded == checksum => {
          return Ok(ChangesetReport::new(id, Status::Skipped));
        }
        Some(recorded) if !run_on_change => {
          return Err(Error::ChecksumMismatch { id, recorded, planned: checksum });
        }
        Some(_) => Status::Reapplied,
        None => Status::Applied,
      };

      let now = Utc::now();
      let stamp = now.to_rfc3339();
      let mut report = ChangesetReport::new(id.clone(), status);
      for (index, plan) in plans.iter().enumerate() {
        let outcome = upsert::execute(tx, plan, &stamp).map_err(|e| Error::Row {
          changeset: id.clone(),
          index,
          kind: kinds[index],
          source: Box::new(e),
        })?;
        tracing::debug!(changeset = %id, index, table = plan.table, ?outcome, "row");
        report.tally(outcome);
      }

      ledger::record(tx, &AppliedChangeset {
        id,
        author,
        checksum,
        applied_at: now,
        row_count: report.rows() as i64,
      })?;
      Ok(report)
    })
    .await
}
