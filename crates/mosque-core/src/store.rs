//! The `MosqueStore` trait.
//!
//! Implemented by storage backends (e.g. `mosque-store-sqlite`). All reads
//! of tenant-scoped tables take a [`TenantScope`]; reference and access
//! tables are shared and take none.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  access::{Permission, Role, User},
  enums::EntityType,
  finance::{
    ContributionObligation, ContributionType, ContributionTypeTranslation, Donation,
    ExchangeRate, MemberContributionExemption, MemberPayment, MembershipFee,
    Subscription,
  },
  gedcom::{Citation, Family, FamilyChild, Individual, Media, Note, Participation, Source},
  registry::{
    Currency, GedcomPersonLink, Member, Membership, Mosque, MosqueCurrency, Person,
  },
  tenant::TenantScope,
};

/// A changeset recorded by the migration runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedChangeset {
  pub id:         String,
  pub author:     Option<String>,
  /// Hex SHA-256 over the changeset's planned statements.
  pub checksum:   String,
  pub applied_at: DateTime<Utc>,
  pub row_count:  i64,
}

/// Read access to a mosque registry.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime.
pub trait MosqueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Genealogy ─────────────────────────────────────────────────────────

  fn get_individual<'a>(
    &'a self,
    scope: TenantScope,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Individual>, Self::Error>> + Send + 'a;

  /// All individuals visible in `scope`, ordered by id.
  fn list_individuals(
    &self,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Vec<Individual>, Self::Error>> + Send + '_;

  fn get_family<'a>(
    &'a self,
    scope: TenantScope,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Family>, Self::Error>> + Send + 'a;

  /// Children of a family, by birth order (unordered last), then id.
  fn family_children<'a>(
    &'a self,
    scope: TenantScope,
    family_id: &'a str,
  ) -> impl Future<Output = Result<Vec<FamilyChild>, Self::Error>> + Send + 'a;

  /// Families in which `child_id` is a child.
  fn parent_families<'a>(
    &'a self,
    scope: TenantScope,
    child_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Family>, Self::Error>> + Send + 'a;

  /// Families in which `individual_id` is husband or wife.
  fn spouse_families<'a>(
    &'a self,
    scope: TenantScope,
    individual_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Family>, Self::Error>> + Send + 'a;

  /// Events `individual_id` participates in, with the role, by date.
  fn individual_events<'a>(
    &'a self,
    scope: TenantScope,
    individual_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + 'a;

  fn event_citations(
    &self,
    scope: TenantScope,
    event_id: i64,
  ) -> impl Future<Output = Result<Vec<Citation>, Self::Error>> + Send + '_;

  /// Notes attached to `(entity_type, entity_id)`.
  fn notes_for<'a>(
    &'a self,
    scope: TenantScope,
    entity_type: EntityType,
    entity_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + 'a;

  fn get_source<'a>(
    &'a self,
    scope: TenantScope,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Source>, Self::Error>> + Send + 'a;

  fn get_media<'a>(
    &'a self,
    scope: TenantScope,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Media>, Self::Error>> + Send + 'a;

  // ── Registry ──────────────────────────────────────────────────────────

  fn list_mosques(
    &self,
  ) -> impl Future<Output = Result<Vec<Mosque>, Self::Error>> + Send + '_;

  fn list_currencies(
    &self,
  ) -> impl Future<Output = Result<Vec<Currency>, Self::Error>> + Send + '_;

  fn mosque_currencies(
    &self,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Vec<MosqueCurrency>, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    scope: TenantScope,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn list_persons(
    &self,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn person_memberships(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<Membership>, Self::Error>> + Send + '_;

  /// The genealogy link of a person, if any.
  fn person_link(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<GedcomPersonLink>, Self::Error>> + Send + '_;

  fn list_members(
    &self,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + '_;

  // ── Finance ───────────────────────────────────────────────────────────

  /// Contribution types visible in `scope`, ordered by code.
  fn list_contribution_types(
    &self,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Vec<ContributionType>, Self::Error>> + Send + '_;

  /// Translations of a contribution type, ordered by locale.
  fn contribution_type_translations(
    &self,
    scope: TenantScope,
    contribution_type_id: i64,
  ) -> impl Future<Output = Result<Vec<ContributionTypeTranslation>, Self::Error>>
  + Send
  + '_;

  /// Obligations of a contribution type, by start date.
  fn contribution_obligations(
    &self,
    scope: TenantScope,
    contribution_type_id: i64,
  ) -> impl Future<Output = Result<Vec<ContributionObligation>, Self::Error>> + Send + '_;

  fn person_exemptions(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<MemberContributionExemption>, Self::Error>>
  + Send
  + '_;

  /// Payments of a person, by payment date.
  fn person_payments(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<MemberPayment>, Self::Error>> + Send + '_;

  /// Fees of a member record, by due date. Scoped through the member.
  fn member_fees(
    &self,
    scope: TenantScope,
    member_id: i64,
  ) -> impl Future<Output = Result<Vec<MembershipFee>, Self::Error>> + Send + '_;

  /// Donations of a person, by donation date.
  fn person_donations(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<Donation>, Self::Error>> + Send + '_;

  /// Subscriptions of a person. Scoped through the person.
  fn person_subscriptions(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;

  /// Rates for one currency pair, newest effective date first.
  fn exchange_rates(
    &self,
    scope: TenantScope,
    from_currency_id: i64,
    to_currency_id: i64,
  ) -> impl Future<Output = Result<Vec<ExchangeRate>, Self::Error>> + Send + '_;

  // ── Access ────────────────────────────────────────────────────────────

  fn list_roles(
    &self,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn user_roles(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  /// Permissions a role may assign.
  fn role_permissions(
    &self,
    role_id: i64,
  ) -> impl Future<Output = Result<Vec<Permission>, Self::Error>> + Send + '_;

  // ── Migrations ────────────────────────────────────────────────────────

  /// Changesets recorded by the migration runner, in application order.
  fn list_changesets(
    &self,
  ) -> impl Future<Output = Result<Vec<AppliedChangeset>, Self::Error>> + Send + '_;
}
