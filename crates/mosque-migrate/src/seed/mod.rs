//! Seed rows: one loosely-typed record per table, tagged by `kind`.
//!
//! Each row knows how to plan itself into an [`Upsert`]. Field names match
//! the column names; every field accepts any scalar (see [`Text`]).
//!
//! [`Text`]: crate::loose::Text

mod access;
mod finance;
mod gedcom;
mod reference;
mod registry;

use serde::Deserialize;

pub use access::{
  PermissionRow, RoleAssignablePermissionRow, RoleRow, UserMemberLinkRow, UserRoleRow,
  UserRow,
};
pub use finance::{
  ContributionObligationRow, ContributionTypeRow, ContributionTypeTranslationRow,
  DonationRow, ExchangeRateRow, ExemptionRow, MembershipFeeRow, PaymentRow,
  SubscriptionRow,
};
pub use gedcom::{
  CitationRow, EventParticipantRow, EventRow, FamilyChildRow, FamilyRow, IndividualRow,
  MediaRow, NoteLinkRow, NoteRow, SourceRow,
};
pub use reference::{CurrencyRow, MosqueCurrencyRow, MosqueRow};
pub use registry::{GedcomPersonLinkRow, MemberRow, MembershipRow, PersonRow};

use crate::{Result, upsert::Upsert};

/// Timestamp columns for tables with `created_at` / `updated_at`.
const CREATED: &[&str] = &["created_at"];
const UPDATED: &[&str] = &["updated_at"];

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedRow {
  Mosque(MosqueRow),
  Currency(CurrencyRow),
  MosqueCurrency(MosqueCurrencyRow),
  Role(RoleRow),
  Permission(PermissionRow),
  RoleAssignablePermission(RoleAssignablePermissionRow),
  User(UserRow),
  UserRole(UserRoleRow),
  UserMemberLink(UserMemberLinkRow),
  Person(PersonRow),
  Member(MemberRow),
  Membership(MembershipRow),
  GedcomPersonLink(GedcomPersonLinkRow),
  GedcomIndividual(IndividualRow),
  GedcomFamily(FamilyRow),
  GedcomFamilyChild(FamilyChildRow),
  GedcomEvent(EventRow),
  GedcomEventParticipant(EventParticipantRow),
  GedcomSource(SourceRow),
  GedcomCitation(CitationRow),
  GedcomNote(NoteRow),
  GedcomNoteLink(NoteLinkRow),
  GedcomMedia(MediaRow),
  ContributionType(ContributionTypeRow),
  ContributionTypeTranslation(ContributionTypeTranslationRow),
  ContributionObligation(ContributionObligationRow),
  MemberContributionExemption(ExemptionRow),
  MemberPayment(PaymentRow),
  MembershipFee(MembershipFeeRow),
  Donation(DonationRow),
  Subscription(SubscriptionRow),
  ExchangeRate(ExchangeRateRow),
}

impl SeedRow {
  /// The `kind` tag this row was written with.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Mosque(_) => "mosque",
      Self::Currency(_) => "currency",
      Self::MosqueCurrency(_) => "mosque_currency",
      Self::Role(_) => "role",
      Self::Permission(_) => "permission",
      Self::RoleAssignablePermission(_) => "role_assignable_permission",
      Self::User(_) => "user",
      Self::UserRole(_) => "user_role",
      Self::UserMemberLink(_) => "user_member_link",
      Self::Person(_) => "person",
      Self::Member(_) => "member",
      Self::Membership(_) => "membership",
      Self::GedcomPersonLink(_) => "gedcom_person_link",
      Self::GedcomIndividual(_) => "gedcom_individual",
      Self::GedcomFamily(_) => "gedcom_family",
      Self::GedcomFamilyChild(_) => "gedcom_family_child",
      Self::GedcomEvent(_) => "gedcom_event",
      Self::GedcomEventParticipant(_) => "gedcom_event_participant",
      Self::GedcomSource(_) => "gedcom_source",
      Self::GedcomCitation(_) => "gedcom_citation",
      Self::GedcomNote(_) => "gedcom_note",
      Self::GedcomNoteLink(_) => "gedcom_note_link",
      Self::GedcomMedia(_) => "gedcom_media",
      Self::ContributionType(_) => "contribution_type",
      Self::ContributionTypeTranslation(_) => "contribution_type_translation",
      Self::ContributionObligation(_) => "contribution_obligation",
      Self::MemberContributionExemption(_) => "member_contribution_exemption",
      Self::MemberPayment(_) => "member_payment",
      Self::MembershipFee(_) => "membership_fee",
      Self::Donation(_) => "donation",
      Self::Subscription(_) => "subscription",
      Self::ExchangeRate(_) => "exchange_rate",
    }
  }

  /// Coerce every field and plan the write.
  pub fn plan(&self) -> Result<Upsert> {
    match self {
      Self::Mosque(r) => r.plan(),
      Self::Currency(r) => r.plan(),
      Self::MosqueCurrency(r) => r.plan(),
      Self::Role(r) => r.plan(),
      Self::Permission(r) => r.plan(),
      Self::RoleAssignablePermission(r) => r.plan(),
      Self::User(r) => r.plan(),
      Self::UserRole(r) => r.plan(),
      Self::UserMemberLink(r) => r.plan(),
      Self::Person(r) => r.plan(),
      Self::Member(r) => r.plan(),
      Self::Membership(r) => r.plan(),
      Self::GedcomPersonLink(r) => r.plan(),
      Self::GedcomIndividual(r) => r.plan(),
      Self::GedcomFamily(r) => r.plan(),
      Self::GedcomFamilyChild(r) => r.plan(),
      Self::GedcomEvent(r) => r.plan(),
      Self::GedcomEventParticipant(r) => r.plan(),
      Self::GedcomSource(r) => r.plan(),
      Self::GedcomCitation(r) => r.plan(),
      Self::GedcomNote(r) => r.plan(),
      Self::GedcomNoteLink(r) => r.plan(),
      Self::GedcomMedia(r) => r.plan(),
      Self::ContributionType(r) => r.plan(),
      Self::ContributionTypeTranslation(r) => r.plan(),
      Self::ContributionObligation(r) => r.plan(),
      Self::MemberContributionExemption(r) => r.plan(),
      Self::MemberPayment(r) => r.plan(),
      Self::MembershipFee(r) => r.plan(),
      Self::Donation(r) => r.plan(),
      Self::Subscription(r) => r.plan(),
      Self::ExchangeRate(r) => r.plan(),
    }
  }
}
