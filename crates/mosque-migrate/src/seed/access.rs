use serde::Deserialize;

use crate::{
  Result,
  coerce::{mosque_id, required, required_fold_id, required_long, string, to_bool},
  loose::Text,
  upsert::{Mode, Upsert},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleRow {
  pub id:          Text,
  pub name:        Text,
  pub description: Text,
}

impl RoleRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("roles", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("name", required("name", &self.name)?)
        .field("description", string(&self.description)),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PermissionRow {
  pub id:          Text,
  pub code:        Text,
  pub description: Text,
  pub category:    Text,
}

impl PermissionRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("permissions", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("code", required("code", &self.code)?)
        .field("description", string(&self.description))
        .field("category", string(&self.category)),
    )
  }
}

/// Grants a permission to a role. Both columns form the key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleAssignablePermissionRow {
  pub role_id:       Text,
  pub permission_id: Text,
}

impl RoleAssignablePermissionRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("role_assignable_permissions", Mode::InsertIfAbsent)
        .key("role_id", required_long("role_id", &self.role_id)?)
        .key(
          "permission_id",
          required_long("permission_id", &self.permission_id)?,
        ),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserRow {
  pub id:                  Text,
  pub username:            Text,
  /// Already-hashed PHC string; see `mosque-migrate hash-password`.
  pub password:            Text,
  pub email:               Text,
  pub account_enabled:     Text,
  pub account_locked:      Text,
  pub credentials_expired: Text,
}

impl UserRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("users", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("username", required("username", &self.username)?)
        .field("password", required("password", &self.password)?)
        .field("email", string(&self.email))
        .field(
          "account_enabled",
          to_bool("account_enabled", &self.account_enabled)?,
        )
        .field("account_locked", to_bool("account_locked", &self.account_locked)?)
        .field(
          "credentials_expired",
          to_bool("credentials_expired", &self.credentials_expired)?,
        ),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserRoleRow {
  pub user_id: Text,
  pub role_id: Text,
}

impl UserRoleRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("user_roles", Mode::InsertIfAbsent)
        .key("user_id", required_long("user_id", &self.user_id)?)
        .key("role_id", required_long("role_id", &self.role_id)?),
    )
  }
}

/// Ties a login account to a person in the registry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserMemberLinkRow {
  pub id:        Text,
  pub user_id:   Text,
  #[serde(alias = "member_id")]
  pub person_id: Text,
  pub mosque_id: Text,
}

impl UserMemberLinkRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("user_member_link", Mode::Upsert)
        .key("id", required_fold_id("id", &self.id)?)
        .field("user_id", required_long("user_id", &self.user_id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .timestamps(&["linked_at"], &[])
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[cfg(test)]
mod tests {
  use rusqlite::types::Value;

  use super::*;
  use crate::coerce::legacy_string_hash;

  #[test]
  fn member_id_is_accepted_for_person_id() {
    let row: UserMemberLinkRow = toml::from_str(
      r#"
        id = "9b1f0c3a-0000-4000-8000-000000000001"
        user_id = 1
        member_id = 7
      "#,
    )
    .unwrap();
    let plan = row.plan().unwrap();
    assert_eq!(plan.fields[1], ("person_id", Value::Integer(7)));
    let folded =
      i64::from(legacy_string_hash("9b1f0c3a-0000-4000-8000-000000000001")).abs();
    assert_eq!(plan.key, vec![("id", Value::Integer(folded))]);
  }

  #[test]
  fn user_flags_left_blank_are_null() {
    let row = UserRow {
      id: "1".into(),
      username: "admin".into(),
      password: "$argon2id$...".into(),
      ..Default::default()
    };
    let plan = row.plan().unwrap();
    assert!(plan.fields[3..].iter().all(|(_, v)| *v == Value::Null));
  }
}
