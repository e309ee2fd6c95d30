use mosque_core::enums::{
  CitationConfidence, EntityType, EventType, MediaType, ParticipantRole,
  RelationshipType,
};
use rusqlite::types::Value;
use serde::Deserialize;

use super::CREATED;
use crate::{
  Result,
  coerce::{
    mosque_id, required, required_enum, required_long, sex, string, to_bool_or,
    to_date, to_enum, to_enum_or, to_int, to_long, to_timestamp,
  },
  loose::Text,
  upsert::{Mode, Upsert},
};

// ─── Individuals and families ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndividualRow {
  pub id:          Text,
  pub given_name:  Text,
  pub surname:     Text,
  /// GEDCOM `M`/`F`/`U`, or a legacy gender code.
  pub sex:         Text,
  pub birth_date:  Text,
  pub birth_place: Text,
  pub death_date:  Text,
  pub death_place: Text,
  pub living:      Text,
  pub mosque_id:   Text,
}

impl IndividualRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_individuals", Mode::Upsert)
        .key("id", required("id", &self.id)?)
        .field("given_name", required("given_name", &self.given_name)?)
        .field("surname", string(&self.surname))
        .field("sex", sex(&self.sex))
        .field("birth_date", to_date("birth_date", &self.birth_date)?)
        .field("birth_place", string(&self.birth_place))
        .field("death_date", to_date("death_date", &self.death_date)?)
        .field("death_place", string(&self.death_place))
        .field("living", to_bool_or("living", &self.living, true)?)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FamilyRow {
  pub id:             Text,
  pub husband_id:     Text,
  pub wife_id:        Text,
  pub marriage_date:  Text,
  pub marriage_place: Text,
  pub divorce_date:   Text,
  pub divorce_place:  Text,
  pub mosque_id:      Text,
}

impl FamilyRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_families", Mode::Upsert)
        .key("id", required("id", &self.id)?)
        .field("husband_id", string(&self.husband_id))
        .field("wife_id", string(&self.wife_id))
        .field("marriage_date", to_date("marriage_date", &self.marriage_date)?)
        .field("marriage_place", string(&self.marriage_place))
        .field("divorce_date", to_date("divorce_date", &self.divorce_date)?)
        .field("divorce_place", string(&self.divorce_place))
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

/// Keyed by the (family, child) pair; the table's own id is a surrogate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FamilyChildRow {
  pub family_id:         Text,
  pub child_id:          Text,
  pub relationship_type: Text,
  pub birth_order:       Text,
  pub mosque_id:         Text,
}

impl FamilyChildRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_family_children", Mode::Upsert)
        .key("family_id", required("family_id", &self.family_id)?)
        .key("child_id", required("child_id", &self.child_id)?)
        .field(
          "relationship_type",
          to_enum_or(
            "relationship_type",
            &self.relationship_type,
            RelationshipType::Biological,
          )?,
        )
        .field("birth_order", to_int("birth_order", &self.birth_order)?)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventRow {
  pub id:          Text,
  #[serde(rename = "type")]
  pub event_type:  Text,
  pub date:        Text,
  pub place:       Text,
  pub description: Text,
  /// Set for family events such as `MARR`.
  pub family_id:   Text,
  pub mosque_id:   Text,
}

impl EventRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_events", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("type", required_enum::<EventType>("type", &self.event_type)?)
        .field("date", to_date("date", &self.date)?)
        .field("place", string(&self.place))
        .field("description", string(&self.description))
        .field("family_id", string(&self.family_id))
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventParticipantRow {
  pub event_id:      Text,
  pub individual_id: Text,
  pub role:          Text,
}

impl EventParticipantRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_event_participants", Mode::InsertIfAbsent)
        .key("event_id", required_long("event_id", &self.event_id)?)
        .key("individual_id", required("individual_id", &self.individual_id)?)
        .key("role", required_enum::<ParticipantRole>("role", &self.role)?),
    )
  }
}

// ─── Sources, citations, notes, media ────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceRow {
  pub id:          Text,
  pub title:       Text,
  pub author:      Text,
  pub publication: Text,
  pub repository:  Text,
  pub call_number: Text,
  pub notes:       Text,
  pub mosque_id:   Text,
}

impl SourceRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_sources", Mode::Upsert)
        .key("id", required("id", &self.id)?)
        .field("title", required("title", &self.title)?)
        .field("author", string(&self.author))
        .field("publication", string(&self.publication))
        .field("repository", string(&self.repository))
        .field("call_number", string(&self.call_number))
        .field("notes", string(&self.notes))
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CitationRow {
  pub id:         Text,
  pub source_id:  Text,
  pub event_id:   Text,
  pub page:       Text,
  pub text:       Text,
  pub confidence: Text,
}

impl CitationRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_citations", Mode::Upsert)
        .key("id", required_long("id", &self.id)?)
        .field("source_id", required("source_id", &self.source_id)?)
        .field("event_id", required_long("event_id", &self.event_id)?)
        .field("page", string(&self.page))
        .field("text", string(&self.text))
        .field(
          "confidence",
          to_enum::<CitationConfidence>("confidence", &self.confidence)?,
        ),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteRow {
  pub id:         Text,
  pub text:       Text,
  pub created_at: Text,
  pub created_by: Text,
  pub mosque_id:  Text,
}

impl NoteRow {
  /// A blank `created_at` is stamped with the run time on first insert.
  pub fn plan(&self) -> Result<Upsert> {
    let plan = Upsert::new("gedcom_notes", Mode::Upsert)
      .key("id", required_long("id", &self.id)?)
      .field("text", required("text", &self.text)?)
      .field("created_by", string(&self.created_by))
      .tenant(mosque_id(&self.mosque_id)?);
    Ok(match to_timestamp("created_at", &self.created_at)? {
      Value::Null => plan.timestamps(CREATED, &[]),
      at => plan.field("created_at", at),
    })
  }
}

/// Attaches a note to any entity; `entity_type` says which table
/// `entity_id` points into.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteLinkRow {
  pub note_id:     Text,
  pub entity_type: Text,
  pub entity_id:   Text,
}

impl NoteLinkRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_note_links", Mode::InsertIfAbsent)
        .key("note_id", required_long("note_id", &self.note_id)?)
        .key(
          "entity_type",
          required_enum::<EntityType>("entity_type", &self.entity_type)?,
        )
        .key("entity_id", required("entity_id", &self.entity_id)?),
    )
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaRow {
  pub id:          Text,
  pub file_path:   Text,
  pub title:       Text,
  pub media_type:  Text,
  pub mime_type:   Text,
  pub description: Text,
  pub file_size:   Text,
  pub mosque_id:   Text,
}

impl MediaRow {
  pub fn plan(&self) -> Result<Upsert> {
    Ok(
      Upsert::new("gedcom_media", Mode::Upsert)
        .key("id", required("id", &self.id)?)
        .field("file_path", required("file_path", &self.file_path)?)
        .field("title", string(&self.title))
        .field(
          "media_type",
          required_enum::<MediaType>("media_type", &self.media_type)?,
        )
        .field("mime_type", string(&self.mime_type))
        .field("description", string(&self.description))
        .field("file_size", to_long("file_size", &self.file_size)?)
        .tenant(mosque_id(&self.mosque_id)?),
    )
  }
}
