//! GEDCOM-shaped genealogy records.
//!
//! An [`Individual`] carries no parent or spouse fields. Relationships are
//! expressed only through join records: a [`Family`] names up to two
//! partners, [`FamilyChild`] attaches children to a family, and
//! [`EventParticipant`] attaches people to events. Notes attach to anything
//! through the polymorphic [`NoteLink`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  enums::{
    CitationConfidence, EntityType, EventType, MediaType, ParticipantRole,
    RelationshipType, Sex,
  },
  tenant::{MosqueId, impl_mosque_aware},
};

// ─── People and families ─────────────────────────────────────────────────────

/// A person (`INDI`). `id` is a GEDCOM xref such as `@I1@`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
  pub id:          String,
  pub given_name:  String,
  pub surname:     Option<String>,
  pub sex:         Option<Sex>,
  pub birth_date:  Option<NaiveDate>,
  pub birth_place: Option<String>,
  pub death_date:  Option<NaiveDate>,
  pub death_place: Option<String>,
  pub living:      bool,
  pub mosque_id:   Option<MosqueId>,
}

impl Individual {
  /// Given name and surname joined with a space.
  pub fn display_name(&self) -> String {
    match &self.surname {
      Some(surname) => format!("{} {}", self.given_name, surname),
      None => self.given_name.clone(),
    }
  }
}

/// A partnership or parent unit (`FAM`). A family may have a single parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
  pub id:             String,
  pub husband_id:     Option<String>,
  pub wife_id:        Option<String>,
  pub marriage_date:  Option<NaiveDate>,
  pub marriage_place: Option<String>,
  pub divorce_date:   Option<NaiveDate>,
  pub divorce_place:  Option<String>,
  pub mosque_id:      Option<MosqueId>,
}

impl Family {
  /// The partner ids that are present, husband first.
  pub fn partner_ids(&self) -> impl Iterator<Item = &str> {
    self.husband_id.iter().chain(self.wife_id.iter()).map(String::as_str)
  }

  /// The other partner of `individual_id`, if it is one of the two.
  pub fn partner_of(&self, individual_id: &str) -> Option<&str> {
    match (self.husband_id.as_deref(), self.wife_id.as_deref()) {
      (Some(h), w) if h == individual_id => w,
      (h, Some(w)) if w == individual_id => h,
      _ => None,
    }
  }
}

/// Attaches a child to a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyChild {
  pub id:                i64,
  pub family_id:         String,
  pub child_id:          String,
  pub relationship_type: RelationshipType,
  pub birth_order:       Option<i32>,
  pub mosque_id:         Option<MosqueId>,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A dated, placed occurrence: birth, marriage, census, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub id:          i64,
  pub event_type:  EventType,
  pub date:        Option<NaiveDate>,
  pub place:       Option<String>,
  pub description: Option<String>,
  /// Set for family events (MARR, DIV, ...).
  pub family_id:   Option<String>,
  pub mosque_id:   Option<MosqueId>,
}

/// Attaches an individual to an event in a given role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParticipant {
  pub id:            i64,
  pub event_id:      i64,
  pub individual_id: String,
  pub role:          ParticipantRole,
}

/// An event as seen from one of its participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participation {
  pub event: Event,
  pub role:  ParticipantRole,
}

// ─── Sources ─────────────────────────────────────────────────────────────────

/// Where genealogical information came from (`SOUR`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
  pub id:          String,
  pub title:       String,
  pub author:      Option<String>,
  pub publication: Option<String>,
  /// Where the source is kept.
  pub repository:  Option<String>,
  pub call_number: Option<String>,
  pub notes:       Option<String>,
  pub mosque_id:   Option<MosqueId>,
}

/// Cites a source for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
  pub id:         i64,
  pub source_id:  String,
  pub event_id:   i64,
  pub page:       Option<String>,
  /// Transcription or extract.
  pub text:       Option<String>,
  pub confidence: Option<CitationConfidence>,
}

// ─── Notes and media ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
  pub id:         i64,
  pub text:       String,
  pub created_at: Option<DateTime<Utc>>,
  pub created_by: Option<String>,
  pub mosque_id:  Option<MosqueId>,
}

/// Attaches a note to any record via `(entity_type, entity_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteLink {
  pub id:          i64,
  pub note_id:     i64,
  pub entity_type: EntityType,
  pub entity_id:   String,
}

/// A file reference (`OBJE`). No binary data lives in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
  pub id:          String,
  pub file_path:   String,
  pub title:       Option<String>,
  pub media_type:  MediaType,
  pub mime_type:   Option<String>,
  pub description: Option<String>,
  /// Size in bytes.
  pub file_size:   Option<i64>,
  pub mosque_id:   Option<MosqueId>,
}

// ─── Tenant ──────────────────────────────────────────────────────────────────

impl_mosque_aware!(Individual, Family, FamilyChild, Event, Source, Note, Media);
