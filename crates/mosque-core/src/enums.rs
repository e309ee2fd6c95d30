//! Enumerations of fixed domain values.
//!
//! Every enum here is stored as text in its column, and every such column
//! carries a `CHECK` constraint listing exactly the strings produced by
//! [`Declared::as_str`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

/// A closed set of string-encoded values.
pub trait Declared:
  Sized + Copy + FromStr + IntoEnumIterator + Into<&'static str>
{
  /// Human-readable name used in error messages.
  const KIND: &'static str;

  /// The stored string form.
  fn as_str(self) -> &'static str { self.into() }

  /// Case-insensitive parse of a stored or user-supplied value.
  fn parse(value: &str) -> Result<Self> {
    value.trim().parse().map_err(|_| Error::UnknownValue {
      kind:  Self::KIND,
      value: value.to_owned(),
    })
  }

  /// All declared string forms, in declaration order.
  fn declared() -> Vec<&'static str> { Self::iter().map(Self::as_str).collect() }
}

// ─── Genealogy ───────────────────────────────────────────────────────────────

/// GEDCOM `SEX` values.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Sex {
  M,
  F,
  /// Unknown or undetermined.
  U,
}

impl Sex {
  /// Map a free-form gender code from member imports onto a GEDCOM sex.
  ///
  /// `V` (vrouw) is female; anything unrecognised is `U`.
  pub fn from_gender(gender: &str) -> Self {
    match gender.trim().to_ascii_uppercase().as_str() {
      "M" => Self::M,
      "F" | "V" => Self::F,
      _ => Self::U,
    }
  }
}

impl Declared for Sex {
  const KIND: &'static str = "sex";
}

/// GEDCOM 5.5.1 individual and family event tags.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EventType {
  // Individual
  #[serde(rename = "BIRT")]
  #[strum(serialize = "BIRT")]
  Birth,
  #[serde(rename = "DEAT")]
  #[strum(serialize = "DEAT")]
  Death,
  /// Christening or naming.
  #[serde(rename = "CHR")]
  #[strum(serialize = "CHR")]
  Christening,
  #[serde(rename = "BURI")]
  #[strum(serialize = "BURI")]
  Burial,
  #[serde(rename = "CENS")]
  #[strum(serialize = "CENS")]
  Census,
  // Family
  #[serde(rename = "MARR")]
  #[strum(serialize = "MARR")]
  Marriage,
  #[serde(rename = "DIV")]
  #[strum(serialize = "DIV")]
  Divorce,
  #[serde(rename = "ANUL")]
  #[strum(serialize = "ANUL")]
  Annulment,
  #[serde(rename = "ENGA")]
  #[strum(serialize = "ENGA")]
  Engagement,
  // Other
  #[serde(rename = "RESI")]
  #[strum(serialize = "RESI")]
  Residence,
  #[serde(rename = "EMIG")]
  #[strum(serialize = "EMIG")]
  Emigration,
  #[serde(rename = "IMMI")]
  #[strum(serialize = "IMMI")]
  Immigration,
  #[serde(rename = "NATU")]
  #[strum(serialize = "NATU")]
  Naturalization,
  #[serde(rename = "GRAD")]
  #[strum(serialize = "GRAD")]
  Graduation,
  #[serde(rename = "RETI")]
  #[strum(serialize = "RETI")]
  Retirement,
  #[serde(rename = "EVEN")]
  #[strum(serialize = "EVEN")]
  Generic,
}

impl EventType {
  /// Events that belong to a family rather than a single individual.
  pub fn is_family_event(self) -> bool {
    matches!(
      self,
      Self::Marriage | Self::Divorce | Self::Annulment | Self::Engagement
    )
  }
}

impl Declared for EventType {
  const KIND: &'static str = "event type";
}

/// Role of an individual in an event.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ParticipantRole {
  /// The person born, married, buried, ...
  Principal,
  Witness,
  Officiant,
  /// A child in a family event such as a census.
  Child,
}

impl Declared for ParticipantRole {
  const KIND: &'static str = "participant role";
}

/// How a child belongs to a family.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RelationshipType {
  #[default]
  Biological,
  Adopted,
  Foster,
}

impl Declared for RelationshipType {
  const KIND: &'static str = "relationship type";
}

/// Discriminator of the polymorphic `entity_id` in note links.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EntityType {
  #[serde(rename = "INDI")]
  #[strum(serialize = "INDI")]
  Individual,
  #[serde(rename = "FAM")]
  #[strum(serialize = "FAM")]
  Family,
  #[serde(rename = "EVENT")]
  #[strum(serialize = "EVENT")]
  Event,
  #[serde(rename = "SOUR")]
  #[strum(serialize = "SOUR")]
  Source,
  #[serde(rename = "OBJE")]
  #[strum(serialize = "OBJE")]
  Media,
}

impl Declared for EntityType {
  const KIND: &'static str = "entity type";
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MediaType {
  Photo,
  /// Scanned document or certificate.
  Document,
  Audio,
  Video,
}

impl Declared for MediaType {
  const KIND: &'static str = "media type";
}

/// Data quality of a citation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CitationConfidence {
  High,
  Medium,
  Low,
}

impl Declared for CitationConfidence {
  const KIND: &'static str = "citation confidence";
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PersonStatus {
  #[default]
  Active,
  /// Temporarily not participating.
  Inactive,
  Deceased,
}

impl Declared for PersonStatus {
  const KIND: &'static str = "person status";
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MembershipType {
  /// Full member with voting rights.
  Full,
  Associate,
  /// Under 18.
  Youth,
  /// 65 and over.
  Senior,
  Family,
}

impl Declared for MembershipType {
  const KIND: &'static str = "membership type";
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MembershipStatus {
  #[default]
  Active,
  Expired,
  Suspended,
  Cancelled,
}

impl Declared for MembershipStatus {
  const KIND: &'static str = "membership status";
}

// ─── Finance ─────────────────────────────────────────────────────────────────

/// How often a contribution obligation falls due.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ContributionFrequency {
  Monthly,
  Yearly,
}

impl Declared for ContributionFrequency {
  const KIND: &'static str = "contribution frequency";
}

/// How a member exemption changes the amount due.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ExemptionType {
  /// Nothing is due.
  Full,
  /// The exemption amount replaces the amount due.
  FixedAmount,
  DiscountAmount,
  /// The exemption amount is a percentage off.
  DiscountPercentage,
}

impl Declared for ExemptionType {
  const KIND: &'static str = "exemption type";
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DonationType {
  Zakat,
  Sadaqah,
  BuildingFund,
  EducationFund,
  RamadanProgram,
  General,
  Other,
}

impl Declared for DonationType {
  const KIND: &'static str = "donation type";
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SubscriptionFrequency {
  Weekly,
  Monthly,
  Quarterly,
  Yearly,
}

impl Declared for SubscriptionFrequency {
  const KIND: &'static str = "subscription frequency";
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SubscriptionStatus {
  #[default]
  Active,
  Paused,
  Cancelled,
  Expired,
}

impl Declared for SubscriptionStatus {
  const KIND: &'static str = "subscription status";
}

/// Settlement state of a membership fee.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum FeeStatus {
  #[default]
  Pending,
  Paid,
  Overdue,
  Cancelled,
}

impl Declared for FeeStatus {
  const KIND: &'static str = "fee status";
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  EnumString, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PaymentMethod {
  Cash,
  BankTransfer,
  CreditCard,
  DebitCard,
  Check,
  Other,
}

impl Declared for PaymentMethod {
  const KIND: &'static str = "payment method";
}
