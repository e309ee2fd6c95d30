//! Human-readable output: run reports and the role dump.

use std::fmt;

use mosque_core::{
  access::{Permission, Role, UserWithRoles},
  store::MosqueStore,
};

use crate::upsert::Outcome;

// ─── Run report ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Applied,
  /// Applied before, changed since, and re-run because of `run_on_change`.
  Reapplied,
  /// Applied before with the same checksum.
  Skipped,
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(match self {
      Self::Applied => "applied",
      Self::Reapplied => "reapplied",
      Self::Skipped => "skipped",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetReport {
  pub id:        String,
  pub status:    Status,
  pub inserted:  usize,
  pub updated:   usize,
  pub unchanged: usize,
}

impl ChangesetReport {
  pub fn new(id: impl Into<String>, status: Status) -> Self {
    Self { id: id.into(), status, inserted: 0, updated: 0, unchanged: 0 }
  }

  pub fn tally(&mut self, outcome: Outcome) {
    match outcome {
      Outcome::Inserted => self.inserted += 1,
      Outcome::Updated => self.updated += 1,
      Outcome::Unchanged => self.unchanged += 1,
    }
  }

  pub fn rows(&self) -> usize { self.inserted + self.updated + self.unchanged }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
  pub changesets: Vec<ChangesetReport>,
}

impl RunReport {
  /// Changesets that wrote anything this run.
  pub fn applied(&self) -> impl Iterator<Item = &ChangesetReport> {
    self.changesets.iter().filter(|c| c.status != Status::Skipped)
  }
}

impl fmt::Display for RunReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for c in &self.changesets {
      write!(f, "{:<10} {}", c.status, c.id)?;
      if c.status != Status::Skipped {
        write!(
          f,
          " ({} inserted, {} updated, {} unchanged)",
          c.inserted, c.updated, c.unchanged
        )?;
      }
      writeln!(f)?;
    }
    write!(
      f,
      "{} of {} changesets applied",
      self.applied().count(),
      self.changesets.len()
    )
  }
}

// ─── Role dump ───────────────────────────────────────────────────────────────

/// Username whose roles are checked at the end of the dump.
pub const ADMIN_USERNAME: &str = "admin";

/// Snapshot of roles and user-role assignments, for debugging access setup.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDump {
  /// Every role with the permissions it may grant.
  pub roles: Vec<(Role, Vec<Permission>)>,
  pub users: Vec<UserWithRoles>,
  /// Roles of [`ADMIN_USERNAME`]; `None` if there is no such user.
  pub admin: Option<Vec<Role>>,
}

impl RoleDump {
  pub async fn collect<S: MosqueStore>(store: &S) -> Result<Self, S::Error> {
    let mut roles = Vec::new();
    for role in store.list_roles().await? {
      let permissions = store.role_permissions(role.id).await?;
      roles.push((role, permissions));
    }

    let mut users = Vec::new();
    for user in store.list_users().await? {
      let roles = store.user_roles(user.id).await?;
      users.push(UserWithRoles { user, roles });
    }

    let admin = match store.find_user_by_username(ADMIN_USERNAME).await? {
      Some(user) => Some(store.user_roles(user.id).await?),
      None => None,
    };
    Ok(Self { roles, users, admin })
  }

  /// Whether the admin user exists and holds at least one role.
  pub fn admin_ok(&self) -> bool { self.admin.as_ref().is_some_and(|r| !r.is_empty()) }
}

fn role_names(roles: &[Role]) -> String {
  if roles.is_empty() {
    return "-".to_owned();
  }
  roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for RoleDump {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "roles ({}):", self.roles.len())?;
    for (role, permissions) in &self.roles {
      write!(f, "  {:>4}  {}", role.id, role.name)?;
      if let Some(description) = &role.description {
        write!(f, " ({description})")?;
      }
      writeln!(f)?;
      for p in permissions {
        writeln!(f, "          {}", p.code)?;
      }
    }

    writeln!(f, "users ({}):", self.users.len())?;
    for u in &self.users {
      writeln!(f, "  {:>4}  {}: {}", u.user.id, u.user.username, role_names(&u.roles))?;
    }

    match &self.admin {
      Some(roles) if !roles.is_empty() => {
        write!(f, "{ADMIN_USERNAME} roles: {}", role_names(roles))
      }
      Some(_) => write!(f, "error: user {ADMIN_USERNAME:?} has no roles"),
      None => write!(f, "error: user {ADMIN_USERNAME:?} not found"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_report_lines() {
    let mut applied = ChangesetReport::new("001", Status::Applied);
    applied.tally(Outcome::Inserted);
    applied.tally(Outcome::Inserted);
    applied.tally(Outcome::Unchanged);
    let report = RunReport {
      changesets: vec![applied, ChangesetReport::new("002", Status::Skipped)],
    };
    assert_eq!(
      report.to_string(),
      "applied    001 (2 inserted, 0 updated, 1 unchanged)\n\
       skipped    002\n\
       1 of 2 changesets applied"
    );
  }

  #[test]
  fn dump_flags_admin_without_roles() {
    let dump = RoleDump { roles: vec![], users: vec![], admin: Some(vec![]) };
    assert!(!dump.admin_ok());
    assert!(dump.to_string().ends_with("error: user \"admin\" has no roles"));

    let dump = RoleDump { admin: None, ..dump };
    assert!(dump.to_string().ends_with("error: user \"admin\" not found"));
  }
}
