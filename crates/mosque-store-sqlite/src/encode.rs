//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as ISO `YYYY-MM-DD`, timestamps as RFC 3339,
//! enums as their declared string form, booleans as 0/1, amounts as decimal
//! text. Each `Raw*` type
//! holds the undecoded columns of one row and knows its own `SELECT` list.

use chrono::{DateTime, NaiveDate, Utc};
use mosque_core::{
  MosqueId,
  access::{Permission, Role, User},
  enums::Declared,
  finance::{
    ContributionObligation, ContributionType, ContributionTypeTranslation, Donation,
    ExchangeRate, MemberContributionExemption, MemberPayment, MembershipFee,
    Subscription,
  },
  gedcom::{
    Citation, Event, Family, FamilyChild, Individual, Media, Note, Participation,
    Source,
  },
  registry::{
    Currency, GedcomPersonLink, Member, Membership, Mosque, MosqueCurrency, Person,
  },
  store::AppliedChangeset,
};
use rusqlite::Row;
use rust_decimal::Decimal;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

fn opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

pub fn decode_decimal(s: &str) -> Result<Decimal> {
  s.parse().map_err(|e| Error::DecimalParse(format!("{s:?}: {e}")))
}

fn opt_decimal(s: Option<String>) -> Result<Option<Decimal>> {
  s.as_deref().map(decode_decimal).transpose()
}

pub fn decode_enum<T: Declared>(s: &str) -> Result<T> { Ok(T::parse(s)?) }

fn opt_enum<T: Declared>(s: Option<String>) -> Result<Option<T>> {
  s.as_deref().map(decode_enum::<T>).transpose()
}

fn mosque(id: Option<i64>) -> Option<MosqueId> { id.map(MosqueId) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// One row as read from SQLite, before decoding.
pub trait RawRow: Sized + Send + 'static {
  type Domain;

  /// `SELECT` list, qualified with the table alias the queries use.
  const COLUMNS: &'static str;

  fn read(row: &Row<'_>) -> rusqlite::Result<Self>;

  fn into_domain(self) -> Result<Self::Domain>;
}

/// Rows whose columns need no decoding read straight into the domain type.
macro_rules! plain_row {
  ($ty:ty, $cols:literal, |$row:ident| $body:expr) => {
    impl RawRow for $ty {
      type Domain = $ty;

      const COLUMNS: &'static str = $cols;

      fn read($row: &Row<'_>) -> rusqlite::Result<Self> { $body }

      fn into_domain(self) -> Result<Self> { Ok(self) }
    }
  };
}

plain_row!(
  Mosque,
  "mo.id, mo.name, mo.short_name, mo.address, mo.city, mo.country,
   mo.postal_code, mo.phone, mo.email, mo.website, mo.active",
  |row| {
    Ok(Mosque {
      id:          MosqueId(row.get(0)?),
      name:        row.get(1)?,
      short_name:  row.get(2)?,
      address:     row.get(3)?,
      city:        row.get(4)?,
      country:     row.get(5)?,
      postal_code: row.get(6)?,
      phone:       row.get(7)?,
      email:       row.get(8)?,
      website:     row.get(9)?,
      active:      row.get(10)?,
    })
  }
);

plain_row!(
  Currency,
  "cu.id, cu.code, cu.name, cu.symbol, cu.decimal_places",
  |row| {
    Ok(Currency {
      id:             row.get(0)?,
      code:           row.get(1)?,
      name:           row.get(2)?,
      symbol:         row.get(3)?,
      decimal_places: row.get(4)?,
    })
  }
);

plain_row!(
  MosqueCurrency,
  "mc.id, mc.mosque_id, mc.currency_id, mc.is_primary, mc.is_active",
  |row| {
    Ok(MosqueCurrency {
      id:          row.get(0)?,
      mosque_id:   mosque(row.get(1)?),
      currency_id: row.get(2)?,
      is_primary:  row.get(3)?,
      is_active:   row.get(4)?,
    })
  }
);

plain_row!(Role, "r.id, r.name, r.description", |row| {
  Ok(Role { id: row.get(0)?, name: row.get(1)?, description: row.get(2)? })
});

plain_row!(Permission, "pm.id, pm.code, pm.description, pm.category", |row| {
  Ok(Permission {
    id:          row.get(0)?,
    code:        row.get(1)?,
    description: row.get(2)?,
    category:    row.get(3)?,
  })
});

plain_row!(
  User,
  "u.id, u.username, u.password, u.email, u.account_enabled,
   u.account_locked, u.credentials_expired",
  |row| {
    Ok(User {
      id:                  row.get(0)?,
      username:            row.get(1)?,
      password:            row.get(2)?,
      email:               row.get(3)?,
      account_enabled:     row.get(4)?,
      account_locked:      row.get(5)?,
      credentials_expired: row.get(6)?,
    })
  }
);

plain_row!(
  Source,
  "s.id, s.title, s.author, s.publication, s.repository, s.call_number,
   s.notes, s.mosque_id",
  |row| {
    Ok(Source {
      id:          row.get(0)?,
      title:       row.get(1)?,
      author:      row.get(2)?,
      publication: row.get(3)?,
      repository:  row.get(4)?,
      call_number: row.get(5)?,
      notes:       row.get(6)?,
      mosque_id:   mosque(row.get(7)?),
    })
  }
);

pub struct RawIndividual {
  pub id:          String,
  pub given_name:  String,
  pub surname:     Option<String>,
  pub sex:         Option<String>,
  pub birth_date:  Option<String>,
  pub birth_place: Option<String>,
  pub death_date:  Option<String>,
  pub death_place: Option<String>,
  pub living:      bool,
  pub mosque_id:   Option<i64>,
}

impl RawRow for RawIndividual {
  type Domain = Individual;

  const COLUMNS: &'static str = "i.id, i.given_name, i.surname, i.sex,
    i.birth_date, i.birth_place, i.death_date, i.death_place, i.living,
    i.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      given_name:  row.get(1)?,
      surname:     row.get(2)?,
      sex:         row.get(3)?,
      birth_date:  row.get(4)?,
      birth_place: row.get(5)?,
      death_date:  row.get(6)?,
      death_place: row.get(7)?,
      living:      row.get(8)?,
      mosque_id:   row.get(9)?,
    })
  }

  fn into_domain(self) -> Result<Individual> {
    Ok(Individual {
      id:          self.id,
      given_name:  self.given_name,
      surname:     self.surname,
      sex:         opt_enum(self.sex)?,
      birth_date:  opt_date(self.birth_date)?,
      birth_place: self.birth_place,
      death_date:  opt_date(self.death_date)?,
      death_place: self.death_place,
      living:      self.living,
      mosque_id:   mosque(self.mosque_id),
    })
  }
}

pub struct RawFamily {
  pub id:             String,
  pub husband_id:     Option<String>,
  pub wife_id:        Option<String>,
  pub marriage_date:  Option<String>,
  pub marriage_place: Option<String>,
  pub divorce_date:   Option<String>,
  pub divorce_place:  Option<String>,
  pub mosque_id:      Option<i64>,
}

impl RawRow for RawFamily {
  type Domain = Family;

  const COLUMNS: &'static str = "f.id, f.husband_id, f.wife_id,
    f.marriage_date, f.marriage_place, f.divorce_date, f.divorce_place,
    f.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      husband_id:     row.get(1)?,
      wife_id:        row.get(2)?,
      marriage_date:  row.get(3)?,
      marriage_place: row.get(4)?,
      divorce_date:   row.get(5)?,
      divorce_place:  row.get(6)?,
      mosque_id:      row.get(7)?,
    })
  }

  fn into_domain(self) -> Result<Family> {
    Ok(Family {
      id:             self.id,
      husband_id:     self.husband_id,
      wife_id:        self.wife_id,
      marriage_date:  opt_date(self.marriage_date)?,
      marriage_place: self.marriage_place,
      divorce_date:   opt_date(self.divorce_date)?,
      divorce_place:  self.divorce_place,
      mosque_id:      mosque(self.mosque_id),
    })
  }
}

pub struct RawFamilyChild {
  pub id:                i64,
  pub family_id:         String,
  pub child_id:          String,
  pub relationship_type: String,
  pub birth_order:       Option<i32>,
  pub mosque_id:         Option<i64>,
}

impl RawRow for RawFamilyChild {
  type Domain = FamilyChild;

  const COLUMNS: &'static str = "fc.id, fc.family_id, fc.child_id,
    fc.relationship_type, fc.birth_order, fc.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      family_id:         row.get(1)?,
      child_id:          row.get(2)?,
      relationship_type: row.get(3)?,
      birth_order:       row.get(4)?,
      mosque_id:         row.get(5)?,
    })
  }

  fn into_domain(self) -> Result<FamilyChild> {
    Ok(FamilyChild {
      id:                self.id,
      family_id:         self.family_id,
      child_id:          self.child_id,
      relationship_type: decode_enum(&self.relationship_type)?,
      birth_order:       self.birth_order,
      mosque_id:         mosque(self.mosque_id),
    })
  }
}

pub struct RawEvent {
  pub id:          i64,
  pub event_type:  String,
  pub date:        Option<String>,
  pub place:       Option<String>,
  pub description: Option<String>,
  pub family_id:   Option<String>,
  pub mosque_id:   Option<i64>,
}

impl RawEvent {
  fn read_at(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      event_type:  row.get(1)?,
      date:        row.get(2)?,
      place:       row.get(3)?,
      description: row.get(4)?,
      family_id:   row.get(5)?,
      mosque_id:   row.get(6)?,
    })
  }

  fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          self.id,
      event_type:  decode_enum(&self.event_type)?,
      date:        opt_date(self.date)?,
      place:       self.place,
      description: self.description,
      family_id:   self.family_id,
      mosque_id:   mosque(self.mosque_id),
    })
  }
}

/// An event row joined with the participant's role.
pub struct RawParticipation {
  pub event: RawEvent,
  pub role:  String,
}

impl RawRow for RawParticipation {
  type Domain = Participation;

  const COLUMNS: &'static str = "e.id, e.type, e.date, e.place,
    e.description, e.family_id, e.mosque_id, ep.role";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { event: RawEvent::read_at(row)?, role: row.get(7)? })
  }

  fn into_domain(self) -> Result<Participation> {
    Ok(Participation {
      event: self.event.into_event()?,
      role:  decode_enum(&self.role)?,
    })
  }
}

pub struct RawCitation {
  pub id:         i64,
  pub source_id:  String,
  pub event_id:   i64,
  pub page:       Option<String>,
  pub text:       Option<String>,
  pub confidence: Option<String>,
}

impl RawRow for RawCitation {
  type Domain = Citation;

  const COLUMNS: &'static str =
    "c.id, c.source_id, c.event_id, c.page, c.text, c.confidence";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      source_id:  row.get(1)?,
      event_id:   row.get(2)?,
      page:       row.get(3)?,
      text:       row.get(4)?,
      confidence: row.get(5)?,
    })
  }

  fn into_domain(self) -> Result<Citation> {
    Ok(Citation {
      id:         self.id,
      source_id:  self.source_id,
      event_id:   self.event_id,
      page:       self.page,
      text:       self.text,
      confidence: opt_enum(self.confidence)?,
    })
  }
}

pub struct RawNote {
  pub id:         i64,
  pub text:       String,
  pub created_at: Option<String>,
  pub created_by: Option<String>,
  pub mosque_id:  Option<i64>,
}

impl RawRow for RawNote {
  type Domain = Note;

  const COLUMNS: &'static str =
    "n.id, n.text, n.created_at, n.created_by, n.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      text:       row.get(1)?,
      created_at: row.get(2)?,
      created_by: row.get(3)?,
      mosque_id:  row.get(4)?,
    })
  }

  fn into_domain(self) -> Result<Note> {
    Ok(Note {
      id:         self.id,
      text:       self.text,
      created_at: opt_dt(self.created_at)?,
      created_by: self.created_by,
      mosque_id:  mosque(self.mosque_id),
    })
  }
}

pub struct RawMedia {
  pub id:          String,
  pub file_path:   String,
  pub title:       Option<String>,
  pub media_type:  String,
  pub mime_type:   Option<String>,
  pub description: Option<String>,
  pub file_size:   Option<i64>,
  pub mosque_id:   Option<i64>,
}

impl RawRow for RawMedia {
  type Domain = Media;

  const COLUMNS: &'static str = "m.id, m.file_path, m.title, m.media_type,
    m.mime_type, m.description, m.file_size, m.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      file_path:   row.get(1)?,
      title:       row.get(2)?,
      media_type:  row.get(3)?,
      mime_type:   row.get(4)?,
      description: row.get(5)?,
      file_size:   row.get(6)?,
      mosque_id:   row.get(7)?,
    })
  }

  fn into_domain(self) -> Result<Media> {
    Ok(Media {
      id:          self.id,
      file_path:   self.file_path,
      title:       self.title,
      media_type:  decode_enum(&self.media_type)?,
      mime_type:   self.mime_type,
      description: self.description,
      file_size:   self.file_size,
      mosque_id:   mosque(self.mosque_id),
    })
  }
}

// ─── Registry rows ───────────────────────────────────────────────────────────

pub struct RawPerson {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     Option<String>,
  pub gender:        Option<String>,
  pub date_of_birth: Option<String>,
  pub date_of_death: Option<String>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub address:       Option<String>,
  pub city:          Option<String>,
  pub country:       Option<String>,
  pub postal_code:   Option<String>,
  pub status:        String,
  pub hash:          Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
  pub mosque_id:     Option<i64>,
}

impl RawRow for RawPerson {
  type Domain = Person;

  const COLUMNS: &'static str = "p.id, p.first_name, p.last_name, p.gender,
    p.date_of_birth, p.date_of_death, p.email, p.phone, p.address, p.city,
    p.country, p.postal_code, p.status, p.hash, p.created_at, p.updated_at,
    p.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      gender:        row.get(3)?,
      date_of_birth: row.get(4)?,
      date_of_death: row.get(5)?,
      email:         row.get(6)?,
      phone:         row.get(7)?,
      address:       row.get(8)?,
      city:          row.get(9)?,
      country:       row.get(10)?,
      postal_code:   row.get(11)?,
      status:        row.get(12)?,
      hash:          row.get(13)?,
      created_at:    row.get(14)?,
      updated_at:    row.get(15)?,
      mosque_id:     row.get(16)?,
    })
  }

  fn into_domain(self) -> Result<Person> {
    Ok(Person {
      id:            self.id,
      first_name:    self.first_name,
      last_name:     self.last_name,
      gender:        self.gender,
      date_of_birth: opt_date(self.date_of_birth)?,
      date_of_death: opt_date(self.date_of_death)?,
      email:         self.email,
      phone:         self.phone,
      address:       self.address,
      city:          self.city,
      country:       self.country,
      postal_code:   self.postal_code,
      status:        decode_enum(&self.status)?,
      hash:          self.hash,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
      mosque_id:     mosque(self.mosque_id),
    })
  }
}

pub struct RawMember {
  pub id:                i64,
  pub individual_id:     Option<String>,
  pub email:             Option<String>,
  pub phone:             Option<String>,
  pub address:           Option<String>,
  pub city:              Option<String>,
  pub country:           Option<String>,
  pub postal_code:       Option<String>,
  pub membership_status: String,
  pub member_since:      Option<String>,
  pub created_at:        String,
  pub updated_at:        String,
  pub mosque_id:         Option<i64>,
}

impl RawRow for RawMember {
  type Domain = Member;

  const COLUMNS: &'static str = "mb.id, mb.individual_id, mb.email,
    mb.phone, mb.address, mb.city, mb.country, mb.postal_code,
    mb.membership_status, mb.member_since, mb.created_at, mb.updated_at,
    mb.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      individual_id:     row.get(1)?,
      email:             row.get(2)?,
      phone:             row.get(3)?,
      address:           row.get(4)?,
      city:              row.get(5)?,
      country:           row.get(6)?,
      postal_code:       row.get(7)?,
      membership_status: row.get(8)?,
      member_since:      row.get(9)?,
      created_at:        row.get(10)?,
      updated_at:        row.get(11)?,
      mosque_id:         row.get(12)?,
    })
  }

  fn into_domain(self) -> Result<Member> {
    Ok(Member {
      id:                self.id,
      individual_id:     self.individual_id,
      email:             self.email,
      phone:             self.phone,
      address:           self.address,
      city:              self.city,
      country:           self.country,
      postal_code:       self.postal_code,
      membership_status: decode_enum(&self.membership_status)?,
      member_since:      opt_date(self.member_since)?,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
      mosque_id:         mosque(self.mosque_id),
    })
  }
}

pub struct RawMembership {
  pub id:              i64,
  pub person_id:       i64,
  pub membership_type: String,
  pub start_date:      String,
  pub end_date:        Option<String>,
  pub status:          String,
  pub notes:           Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
  pub mosque_id:       Option<i64>,
}

impl RawRow for RawMembership {
  type Domain = Membership;

  const COLUMNS: &'static str = "ms.id, ms.person_id, ms.membership_type,
    ms.start_date, ms.end_date, ms.status, ms.notes, ms.created_at,
    ms.updated_at, ms.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      person_id:       row.get(1)?,
      membership_type: row.get(2)?,
      start_date:      row.get(3)?,
      end_date:        row.get(4)?,
      status:          row.get(5)?,
      notes:           row.get(6)?,
      created_at:      row.get(7)?,
      updated_at:      row.get(8)?,
      mosque_id:       row.get(9)?,
    })
  }

  fn into_domain(self) -> Result<Membership> {
    Ok(Membership {
      id:              self.id,
      person_id:       self.person_id,
      membership_type: decode_enum(&self.membership_type)?,
      start_date:      decode_date(&self.start_date)?,
      end_date:        opt_date(self.end_date)?,
      status:          decode_enum(&self.status)?,
      notes:           self.notes,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
      mosque_id:       mosque(self.mosque_id),
    })
  }
}

pub struct RawPersonLink {
  pub id:                   i64,
  pub person_id:            i64,
  pub gedcom_individual_id: String,
  pub linked_by:            Option<String>,
  pub link_reason:          Option<String>,
  pub linked_at:            String,
  pub updated_at:           String,
  pub mosque_id:            Option<i64>,
}

impl RawRow for RawPersonLink {
  type Domain = GedcomPersonLink;

  const COLUMNS: &'static str = "gl.id, gl.person_id, gl.gedcom_individual_id,
    gl.linked_by, gl.link_reason, gl.linked_at, gl.updated_at, gl.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      person_id:            row.get(1)?,
      gedcom_individual_id: row.get(2)?,
      linked_by:            row.get(3)?,
      link_reason:          row.get(4)?,
      linked_at:            row.get(5)?,
      updated_at:           row.get(6)?,
      mosque_id:            row.get(7)?,
    })
  }

  fn into_domain(self) -> Result<GedcomPersonLink> {
    Ok(GedcomPersonLink {
      id:                   self.id,
      person_id:            self.person_id,
      gedcom_individual_id: self.gedcom_individual_id,
      linked_by:            self.linked_by,
      link_reason:          self.link_reason,
      linked_at:            decode_dt(&self.linked_at)?,
      updated_at:           decode_dt(&self.updated_at)?,
      mosque_id:            mosque(self.mosque_id),
    })
  }
}

// ─── Finance rows ────────────────────────────────────────────────────────────

pub struct RawContributionType {
  pub id:          i64,
  pub code:        String,
  pub is_required: bool,
  pub is_active:   bool,
  pub created_at:  String,
  pub mosque_id:   Option<i64>,
}

impl RawRow for RawContributionType {
  type Domain = ContributionType;

  const COLUMNS: &'static str =
    "ct.id, ct.code, ct.is_required, ct.is_active, ct.created_at, ct.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      code:        row.get(1)?,
      is_required: row.get(2)?,
      is_active:   row.get(3)?,
      created_at:  row.get(4)?,
      mosque_id:   row.get(5)?,
    })
  }

  fn into_domain(self) -> Result<ContributionType> {
    Ok(ContributionType {
      id:          self.id,
      code:        self.code,
      is_required: self.is_required,
      is_active:   self.is_active,
      created_at:  decode_dt(&self.created_at)?,
      mosque_id:   mosque(self.mosque_id),
    })
  }
}

plain_row!(
  ContributionTypeTranslation,
  "ctt.id, ctt.contribution_type_id, ctt.locale, ctt.name, ctt.description",
  |row| {
    Ok(ContributionTypeTranslation {
      id:                   row.get(0)?,
      contribution_type_id: row.get(1)?,
      locale:               row.get(2)?,
      name:                 row.get(3)?,
      description:          row.get(4)?,
    })
  }
);

pub struct RawObligation {
  pub id:                   i64,
  pub contribution_type_id: i64,
  pub amount:               String,
  pub frequency:            String,
  pub start_date:           String,
  pub currency_id:          Option<i64>,
  pub mosque_id:            Option<i64>,
}

impl RawRow for RawObligation {
  type Domain = ContributionObligation;

  const COLUMNS: &'static str = "co.id, co.contribution_type_id, co.amount,
    co.frequency, co.start_date, co.currency_id, co.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      contribution_type_id: row.get(1)?,
      amount:               row.get(2)?,
      frequency:            row.get(3)?,
      start_date:           row.get(4)?,
      currency_id:          row.get(5)?,
      mosque_id:            row.get(6)?,
    })
  }

  fn into_domain(self) -> Result<ContributionObligation> {
    Ok(ContributionObligation {
      id:                   self.id,
      contribution_type_id: self.contribution_type_id,
      amount:               decode_decimal(&self.amount)?,
      frequency:            decode_enum(&self.frequency)?,
      start_date:           decode_date(&self.start_date)?,
      currency_id:          self.currency_id,
      mosque_id:            mosque(self.mosque_id),
    })
  }
}

pub struct RawExemption {
  pub id:                   i64,
  pub person_id:            i64,
  pub contribution_type_id: i64,
  pub exemption_type:       String,
  pub amount:               Option<String>,
  pub reason:               Option<String>,
  pub start_date:           String,
  pub end_date:             Option<String>,
  pub is_active:            bool,
  pub mosque_id:            Option<i64>,
}

impl RawRow for RawExemption {
  type Domain = MemberContributionExemption;

  const COLUMNS: &'static str = "ex.id, ex.person_id, ex.contribution_type_id,
    ex.exemption_type, ex.amount, ex.reason, ex.start_date, ex.end_date,
    ex.is_active, ex.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      person_id:            row.get(1)?,
      contribution_type_id: row.get(2)?,
      exemption_type:       row.get(3)?,
      amount:               row.get(4)?,
      reason:               row.get(5)?,
      start_date:           row.get(6)?,
      end_date:             row.get(7)?,
      is_active:            row.get(8)?,
      mosque_id:            row.get(9)?,
    })
  }

  fn into_domain(self) -> Result<MemberContributionExemption> {
    Ok(MemberContributionExemption {
      id:                   self.id,
      person_id:            self.person_id,
      contribution_type_id: self.contribution_type_id,
      exemption_type:       decode_enum(&self.exemption_type)?,
      amount:               opt_decimal(self.amount)?,
      reason:               self.reason,
      start_date:           decode_date(&self.start_date)?,
      end_date:             opt_date(self.end_date)?,
      is_active:            self.is_active,
      mosque_id:            mosque(self.mosque_id),
    })
  }
}

pub struct RawPayment {
  pub id:                   i64,
  pub person_id:            i64,
  pub contribution_type_id: i64,
  pub amount:               String,
  pub payment_date:         String,
  pub reference:            Option<String>,
  pub notes:                Option<String>,
  pub created_by:           Option<i64>,
  pub currency_id:          Option<i64>,
  pub created_at:           String,
  pub mosque_id:            Option<i64>,
}

impl RawRow for RawPayment {
  type Domain = MemberPayment;

  const COLUMNS: &'static str = "pa.id, pa.person_id, pa.contribution_type_id,
    pa.amount, pa.payment_date, pa.reference, pa.notes, pa.created_by,
    pa.currency_id, pa.created_at, pa.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      person_id:            row.get(1)?,
      contribution_type_id: row.get(2)?,
      amount:               row.get(3)?,
      payment_date:         row.get(4)?,
      reference:            row.get(5)?,
      notes:                row.get(6)?,
      created_by:           row.get(7)?,
      currency_id:          row.get(8)?,
      created_at:           row.get(9)?,
      mosque_id:            row.get(10)?,
    })
  }

  fn into_domain(self) -> Result<MemberPayment> {
    Ok(MemberPayment {
      id:                   self.id,
      person_id:            self.person_id,
      contribution_type_id: self.contribution_type_id,
      amount:               decode_decimal(&self.amount)?,
      payment_date:         decode_date(&self.payment_date)?,
      reference:            self.reference,
      notes:                self.notes,
      created_by:           self.created_by,
      currency_id:          self.currency_id,
      created_at:           decode_dt(&self.created_at)?,
      mosque_id:            mosque(self.mosque_id),
    })
  }
}

pub struct RawFee {
  pub id:                    i64,
  pub member_id:             i64,
  pub amount:                String,
  pub due_date:              String,
  pub paid_date:             Option<String>,
  pub status:                String,
  pub payment_method:        Option<String>,
  pub transaction_reference: Option<String>,
  pub notes:                 Option<String>,
  pub created_at:            Option<String>,
}

impl RawRow for RawFee {
  type Domain = MembershipFee;

  const COLUMNS: &'static str = "fe.id, fe.member_id, fe.amount, fe.due_date,
    fe.paid_date, fe.status, fe.payment_method, fe.transaction_reference,
    fe.notes, fe.created_at";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                    row.get(0)?,
      member_id:             row.get(1)?,
      amount:                row.get(2)?,
      due_date:              row.get(3)?,
      paid_date:             row.get(4)?,
      status:                row.get(5)?,
      payment_method:        row.get(6)?,
      transaction_reference: row.get(7)?,
      notes:                 row.get(8)?,
      created_at:            row.get(9)?,
    })
  }

  fn into_domain(self) -> Result<MembershipFee> {
    Ok(MembershipFee {
      id:                    self.id,
      member_id:             self.member_id,
      amount:                decode_decimal(&self.amount)?,
      due_date:              decode_date(&self.due_date)?,
      paid_date:             opt_date(self.paid_date)?,
      status:                decode_enum(&self.status)?,
      payment_method:        opt_enum(self.payment_method)?,
      transaction_reference: self.transaction_reference,
      notes:                 self.notes,
      created_at:            opt_dt(self.created_at)?,
    })
  }
}

pub struct RawDonation {
  pub id:             i64,
  pub person_id:      i64,
  pub amount:         String,
  pub donation_type:  String,
  pub donation_date:  String,
  pub receipt_number: Option<String>,
  pub notes:          Option<String>,
  pub anonymous:      bool,
  pub created_at:     String,
  pub mosque_id:      Option<i64>,
}

impl RawRow for RawDonation {
  type Domain = Donation;

  const COLUMNS: &'static str = "d.id, d.person_id, d.amount, d.donation_type,
    d.donation_date, d.receipt_number, d.notes, d.anonymous, d.created_at,
    d.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      person_id:      row.get(1)?,
      amount:         row.get(2)?,
      donation_type:  row.get(3)?,
      donation_date:  row.get(4)?,
      receipt_number: row.get(5)?,
      notes:          row.get(6)?,
      anonymous:      row.get(7)?,
      created_at:     row.get(8)?,
      mosque_id:      row.get(9)?,
    })
  }

  fn into_domain(self) -> Result<Donation> {
    Ok(Donation {
      id:             self.id,
      person_id:      self.person_id,
      amount:         decode_decimal(&self.amount)?,
      donation_type:  decode_enum(&self.donation_type)?,
      donation_date:  decode_date(&self.donation_date)?,
      receipt_number: self.receipt_number,
      notes:          self.notes,
      anonymous:      self.anonymous,
      created_at:     decode_dt(&self.created_at)?,
      mosque_id:      mosque(self.mosque_id),
    })
  }
}

pub struct RawSubscription {
  pub id:        i64,
  pub person_id: i64,
  pub frequency: String,
  pub status:    String,
}

impl RawRow for RawSubscription {
  type Domain = Subscription;

  const COLUMNS: &'static str = "sb.id, sb.person_id, sb.frequency, sb.status";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      person_id: row.get(1)?,
      frequency: row.get(2)?,
      status:    row.get(3)?,
    })
  }

  fn into_domain(self) -> Result<Subscription> {
    Ok(Subscription {
      id:        self.id,
      person_id: self.person_id,
      frequency: decode_enum(&self.frequency)?,
      status:    decode_enum(&self.status)?,
    })
  }
}

pub struct RawExchangeRate {
  pub id:               i64,
  pub from_currency_id: i64,
  pub to_currency_id:   i64,
  pub rate:             String,
  pub effective_date:   String,
  pub created_at:       Option<String>,
  pub mosque_id:        Option<i64>,
}

impl RawRow for RawExchangeRate {
  type Domain = ExchangeRate;

  const COLUMNS: &'static str = "xr.id, xr.from_currency_id, xr.to_currency_id,
    xr.rate, xr.effective_date, xr.created_at, xr.mosque_id";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      from_currency_id: row.get(1)?,
      to_currency_id:   row.get(2)?,
      rate:             row.get(3)?,
      effective_date:   row.get(4)?,
      created_at:       row.get(5)?,
      mosque_id:        row.get(6)?,
    })
  }

  fn into_domain(self) -> Result<ExchangeRate> {
    Ok(ExchangeRate {
      id:               self.id,
      from_currency_id: self.from_currency_id,
      to_currency_id:   self.to_currency_id,
      rate:             decode_decimal(&self.rate)?,
      effective_date:   decode_date(&self.effective_date)?,
      created_at:       opt_dt(self.created_at)?,
      mosque_id:        mosque(self.mosque_id),
    })
  }
}

pub struct RawChangeset {
  pub id:         String,
  pub author:     Option<String>,
  pub checksum:   String,
  pub applied_at: String,
  pub row_count:  i64,
}

impl RawRow for RawChangeset {
  type Domain = AppliedChangeset;

  const COLUMNS: &'static str =
    "ac.id, ac.author, ac.checksum, ac.applied_at, ac.row_count";

  fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      author:     row.get(1)?,
      checksum:   row.get(2)?,
      applied_at: row.get(3)?,
      row_count:  row.get(4)?,
    })
  }

  fn into_domain(self) -> Result<AppliedChangeset> {
    Ok(AppliedChangeset {
      id:         self.id,
      author:     self.author,
      checksum:   self.checksum,
      applied_at: decode_dt(&self.applied_at)?,
      row_count:  self.row_count,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_are_iso() {
    let d = decode_date("1975-03-09").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(1975, 3, 9).unwrap());
    assert!(matches!(decode_date("09/03/1975"), Err(Error::DateParse(_))));
  }

  #[test]
  fn amounts_are_exact() {
    assert_eq!(decode_decimal("35.10").unwrap().to_string(), "35.10");
    assert!(matches!(decode_decimal("35,10"), Err(Error::DecimalParse(_))));
  }

  #[test]
  fn timestamps_roundtrip() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }
}
