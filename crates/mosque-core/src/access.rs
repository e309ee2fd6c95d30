//! Logins, roles, and permissions. These tables are shared by all tenants.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id:                  i64,
  pub username:            String,
  /// Password hash in PHC string form; never a plain password.
  #[serde(skip_serializing)]
  pub password:            String,
  pub email:               Option<String>,
  pub account_enabled:     Option<bool>,
  pub account_locked:      Option<bool>,
  pub credentials_expired: Option<bool>,
}

impl User {
  /// Enabled, not locked, credentials not expired. Unset flags count as
  /// the permissive value.
  pub fn can_log_in(&self) -> bool {
    self.account_enabled.unwrap_or(true)
      && !self.account_locked.unwrap_or(false)
      && !self.credentials_expired.unwrap_or(false)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
  pub id:          i64,
  /// Stable machine name, e.g. `member.view`.
  pub code:        String,
  pub description: Option<String>,
  pub category:    Option<String>,
}

/// A user together with the roles granted to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithRoles {
  pub user:  User,
  pub roles: Vec<Role>,
}
