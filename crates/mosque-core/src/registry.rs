//! Mosques, reference data, and the member registry.
//!
//! A [`Person`] is the identity layer for everyone the registry knows
//! about. A person may be linked one-to-one to a genealogy
//! [`Individual`](crate::gedcom::Individual) through a
//! [`GedcomPersonLink`], and to a login through a [`UserMemberLink`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
  enums::{MembershipStatus, MembershipType, PersonStatus},
  tenant::{MosqueId, impl_mosque_aware},
};

// ─── Tenants and reference data ──────────────────────────────────────────────

/// A tenant. Its id is the value every `mosque_id` column refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mosque {
  pub id:          MosqueId,
  pub name:        String,
  pub short_name:  Option<String>,
  pub address:     Option<String>,
  pub city:        Option<String>,
  pub country:     Option<String>,
  pub postal_code: Option<String>,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub website:     Option<String>,
  pub active:      bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
  pub id:             i64,
  /// ISO 4217 code, e.g. `EUR`.
  pub code:           String,
  pub name:           String,
  pub symbol:         Option<String>,
  pub decimal_places: i32,
}

/// A currency enabled for one mosque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosqueCurrency {
  pub id:          i64,
  pub mosque_id:   Option<MosqueId>,
  pub currency_id: i64,
  pub is_primary:  bool,
  pub is_active:   bool,
}

// ─── People ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     Option<String>,
  pub gender:        Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub date_of_death: Option<NaiveDate>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub address:       Option<String>,
  pub city:          Option<String>,
  pub country:       Option<String>,
  pub postal_code:   Option<String>,
  pub status:        PersonStatus,
  /// See [`person_fingerprint`].
  pub hash:          Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
  pub mosque_id:     Option<MosqueId>,
}

/// Identity fingerprint of a person: lowercase hex SHA-256 over
/// `first:last:date_of_birth`, each part trimmed, absent parts empty.
pub fn person_fingerprint(
  first_name:    Option<&str>,
  last_name:     Option<&str>,
  date_of_birth: Option<NaiveDate>,
) -> String {
  let dob = date_of_birth.map(|d| d.to_string()).unwrap_or_default();
  let canonical = [
    first_name.unwrap_or_default().trim(),
    last_name.unwrap_or_default().trim(),
    dob.as_str(),
  ]
  .join(":");
  hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Membership administration record, optionally tied to an individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
  pub id:                i64,
  /// GEDCOM xref of the linked individual, e.g. `@I1@`.
  pub individual_id:     Option<String>,
  pub email:             Option<String>,
  pub phone:             Option<String>,
  pub address:           Option<String>,
  pub city:              Option<String>,
  pub country:           Option<String>,
  pub postal_code:       Option<String>,
  pub membership_status: MembershipStatus,
  pub member_since:      Option<NaiveDate>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
  pub mosque_id:         Option<MosqueId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
  pub id:              i64,
  pub person_id:       i64,
  pub membership_type: MembershipType,
  pub start_date:      NaiveDate,
  pub end_date:        Option<NaiveDate>,
  pub status:          MembershipStatus,
  pub notes:           Option<String>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  pub mosque_id:       Option<MosqueId>,
}

impl Membership {
  /// Active on `day`: status is active and `day` falls within the dates.
  pub fn is_current(&self, day: NaiveDate) -> bool {
    self.status == MembershipStatus::Active
      && self.start_date <= day
      && self.end_date.is_none_or(|end| day <= end)
  }
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// One-to-one link between a person and a genealogy individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GedcomPersonLink {
  pub id:                   i64,
  pub person_id:            i64,
  pub gedcom_individual_id: String,
  pub linked_by:            Option<String>,
  pub link_reason:          Option<String>,
  pub linked_at:            DateTime<Utc>,
  pub updated_at:           DateTime<Utc>,
  pub mosque_id:            Option<MosqueId>,
}

/// One-to-one link between a login and a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemberLink {
  pub id:        i64,
  pub user_id:   i64,
  pub person_id: i64,
  pub linked_at: DateTime<Utc>,
  pub mosque_id: Option<MosqueId>,
}

impl_mosque_aware!(
  MosqueCurrency,
  Person,
  Member,
  Membership,
  GedcomPersonLink,
  UserMemberLink,
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fingerprint_is_stable_and_trimmed() {
    let dob = NaiveDate::from_ymd_opt(1980, 5, 17);
    let a = person_fingerprint(Some("Amina"), Some("Yusuf"), dob);
    let b = person_fingerprint(Some(" Amina "), Some("Yusuf\n"), dob);
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
  }

  #[test]
  fn fingerprint_of_empty_parts() {
    assert_eq!(
      person_fingerprint(None, None, None),
      hex::encode(Sha256::digest(b"::"))
    );
  }

  #[test]
  fn membership_current_window() {
    let m = Membership {
      id:              1,
      person_id:       1,
      membership_type: MembershipType::Full,
      start_date:      NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      end_date:        NaiveDate::from_ymd_opt(2024, 12, 31),
      status:          MembershipStatus::Active,
      notes:           None,
      created_at:      Utc::now(),
      updated_at:      Utc::now(),
      mosque_id:       None,
    };
    assert!(m.is_current(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    assert!(!m.is_current(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    assert!(!m.is_current(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
  }
}
