use mosque_core::{
  enums::{MembershipStatus, MembershipType, PersonStatus},
  registry::person_fingerprint,
};
use rusqlite::types::Value;
use serde::Deserialize;

use super::{CREATED, UPDATED};
use crate::{
  Error, Result,
  coerce::{
    date_value, mosque_id, parse_date, required, required_enum, required_fold_id,
    string, to_date, to_enum_or,
  },
  loose::Text,
  upsert::{Mode, Upsert},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonRow {
  pub id:            Text,
  pub first_name:    Text,
  pub last_name:     Text,
  pub gender:        Text,
  pub date_of_birth: Text,
  pub date_of_death: Text,
  pub email:         Text,
  pub phone:         Text,
  pub address:       Text,
  pub city:          Text,
  pub country:       Text,
  pub postal_code:   Text,
  pub status:        Text,
  pub mosque_id:     Text,
}

impl PersonRow {
  /// The `hash` column is derived from name and birth date, never read
  /// from the row.
  pub fn plan(&self) -> Result<Upsert> {
    let dob = parse_date("date_of_birth", &self.date_of_birth)?;
    let hash =
      person_fingerprint(self.first_name.get(), self.last_name.get(), dob);
    Ok(
      Upsert::new("persons", Mode::Upsert)
        .key("id", required_fold_id("id", &self.id)?)
        .field("first_name", required("first_name", &self.first_name)?)
        .field("last_name", string(&self.last_name))
        .field("gender", string(&self.gender))
        .field("date_of_birth", date_value(dob))
        .field("date_of_death", to_date("date_of_death", &self.date_of_death)?)
        .field("email", string(&self.email))
        .field("phone", string(&self.phone))
        .field("address", string(&self.address))
        .field("city", string(&self.city))
        .field("country", string(&self.country))
        .field("postal_code", string(&self.postal_code))
        .field("status", to_enum_or("status", &self.status, PersonStatus::Active)?)
        .field("hash", Value::Text(hash))
        .timestamps(CREATED, UPDATED)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemberRow {
  pub id:                Text,
  pub individual_id:     Text,
  pub email:             Text,
  pub phone:             Text,
  pub address:           Text,
  pub city:              Text,
  pub country:           Text,
  pub postal_code:       Text,
  pub membership_status: Text,
  pub member_since:      Text,
  pub mosque_id:         Text,
}

impl MemberRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("members", Mode::Upsert)
        .key("id", required_fold_id("id", &self.id)?)
        .field("individual_id", string(&self.individual_id))
        .field("email", string(&self.email))
        .field("phone", string(&self.phone))
        .field("address", string(&self.address))
        .field("city", string(&self.city))
        .field("country", string(&self.country))
        .field("postal_code", string(&self.postal_code))
        .field(
          "membership_status",
          to_enum_or(
            "membership_status",
            &self.membership_status,
            MembershipStatus::Active,
          )?,
        )
        .field("member_since", to_date("member_since", &self.member_since)?)
        .timestamps(CREATED, UPDATED)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MembershipRow {
  pub id:              Text,
  pub person_id:       Text,
  pub membership_type: Text,
  pub start_date:      Text,
  pub end_date:        Text,
  pub status:          Text,
  pub notes:           Text,
  pub mosque_id:       Text,
}

impl MembershipRow {
  pub fn plan(&self) -> Result<Upsert> {
    let start = parse_date("start_date", &self.start_date)?
      .ok_or(Error::MissingField("start_date"))?;
    Ok(
      Upsert::new("memberships", Mode::Upsert)
        .key("id", required_fold_id("id", &self.id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .field(
          "membership_type",
          required_enum::<MembershipType>("membership_type", &self.membership_type)?,
        )
        .field("start_date", date_value(Some(start)))
        .field("end_date", to_date("end_date", &self.end_date)?)
        .field(
          "status",
          to_enum_or("status", &self.status, MembershipStatus::Active)?,
        )
        .field("notes", string(&self.notes))
        .timestamps(CREATED, UPDATED)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GedcomPersonLinkRow {
  pub id:                   Text,
  pub person_id:            Text,
  pub gedcom_individual_id: Text,
  pub linked_by:            Text,
  pub link_reason:          Text,
  pub mosque_id:            Text,
}

impl GedcomPersonLinkRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_person_links", Mode::Upsert)
        .key("id", required_fold_id("id", &self.id)?)
        .field("person_id", required_fold_id("person_id", &self.person_id)?)
        .field(
          "gedcom_individual_id",
          required("gedcom_individual_id", &self.gedcom_individual_id)?,
        )
        .field("linked_by", string(&self.linked_by))
        .field("link_reason", string(&self.link_reason))
        .timestamps(&["linked_at"], UPDATED)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}
