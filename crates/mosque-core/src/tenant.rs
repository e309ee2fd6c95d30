//! Tenant scoping.
//!
//! Most tables carry a `mosque_id` discriminator. Reads are always issued
//! with a [`TenantScope`]: a single mosque, or [`TenantScope::All`] for
//! super administrators, for whom the row filter is disabled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier of a mosque (tenant).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MosqueId(pub i64);

impl fmt::Display for MosqueId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// The tenant a read or write is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
  Mosque(MosqueId),
  /// Super administrator: no row filter.
  All,
}

impl TenantScope {
  pub fn mosque_id(self) -> Option<MosqueId> {
    match self {
      Self::Mosque(id) => Some(id),
      Self::All => None,
    }
  }

  pub fn is_super_admin(self) -> bool { matches!(self, Self::All) }

  /// Whether a row carrying `row_mosque` is visible under this scope.
  pub fn admits(self, row_mosque: Option<MosqueId>) -> bool {
    match self {
      Self::All => true,
      Self::Mosque(id) => row_mosque == Some(id),
    }
  }

  /// Fill an absent `mosque_id` from this scope.
  ///
  /// An id that is already set is preserved, so a super administrator can
  /// write rows for an explicit tenant. Returns `true` if the entity was
  /// changed.
  pub fn stamp<T: MosqueAware + ?Sized>(self, entity: &mut T) -> bool {
    match (entity.mosque_id(), self.mosque_id()) {
      (None, Some(id)) => {
        entity.set_mosque_id(id);
        true
      }
      _ => false,
    }
  }

  /// Parse an optional header value such as `X-Mosque-Id`.
  ///
  /// Absent or blank means no narrowing ([`TenantScope::All`]).
  pub fn parse_header(value: Option<&str>) -> Result<Self> {
    match value.map(str::trim) {
      None | Some("") => Ok(Self::All),
      Some(raw) => raw
        .parse::<i64>()
        .map(|id| Self::Mosque(MosqueId(id)))
        .map_err(|_| Error::InvalidMosqueId(raw.to_owned())),
    }
  }
}

impl From<Option<MosqueId>> for TenantScope {
  fn from(id: Option<MosqueId>) -> Self {
    id.map_or(Self::All, Self::Mosque)
  }
}

/// A record that belongs to a single mosque.
pub trait MosqueAware {
  fn mosque_id(&self) -> Option<MosqueId>;
  fn set_mosque_id(&mut self, id: MosqueId);
}

/// Implement [`MosqueAware`] for records with a `mosque_id: Option<MosqueId>`
/// field.
macro_rules! impl_mosque_aware {
  ($($ty:ty),* $(,)?) => {
    $(
      impl $crate::tenant::MosqueAware for $ty {
        fn mosque_id(&self) -> Option<$crate::tenant::MosqueId> { self.mosque_id }
        fn set_mosque_id(&mut self, id: $crate::tenant::MosqueId) {
          self.mosque_id = Some(id);
        }
      }
    )*
  };
}

pub(crate) use impl_mosque_aware;

#[cfg(test)]
mod tests {
  use super::*;

  struct Row(Option<MosqueId>);

  impl MosqueAware for Row {
    fn mosque_id(&self) -> Option<MosqueId> { self.0 }
    fn set_mosque_id(&mut self, id: MosqueId) { self.0 = Some(id); }
  }

  #[test]
  fn stamp_fills_missing_mosque() {
    let mut row = Row(None);
    assert!(TenantScope::Mosque(MosqueId(7)).stamp(&mut row));
    assert_eq!(row.0, Some(MosqueId(7)));
  }

  #[test]
  fn stamp_keeps_explicit_mosque() {
    let mut row = Row(Some(MosqueId(3)));
    assert!(!TenantScope::Mosque(MosqueId(7)).stamp(&mut row));
    assert_eq!(row.0, Some(MosqueId(3)));
  }

  #[test]
  fn super_admin_never_stamps() {
    let mut row = Row(None);
    assert!(!TenantScope::All.stamp(&mut row));
    assert_eq!(row.0, None);
  }

  #[test]
  fn admits_filters_by_tenant() {
    let scope = TenantScope::Mosque(MosqueId(1));
    assert!(scope.admits(Some(MosqueId(1))));
    assert!(!scope.admits(Some(MosqueId(2))));
    assert!(!scope.admits(None));
    assert!(TenantScope::All.admits(None));
  }

  #[test]
  fn parse_header_values() {
    assert_eq!(TenantScope::parse_header(None).unwrap(), TenantScope::All);
    assert_eq!(TenantScope::parse_header(Some("  ")).unwrap(), TenantScope::All);
    assert_eq!(
      TenantScope::parse_header(Some(" 12 ")).unwrap(),
      TenantScope::Mosque(MosqueId(12))
    );
    assert!(matches!(
      TenantScope::parse_header(Some("twelve")),
      Err(Error::InvalidMosqueId(_))
    ));
  }
}
