//! [`SqliteStore`]: the SQLite implementation of [`MosqueStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};

use mosque_core::{
  TenantScope,
  access::{Permission, Role, User},
  enums::{Declared as _, EntityType},
  finance::{
    ContributionObligation, ContributionType, ContributionTypeTranslation, Donation,
    ExchangeRate, MemberContributionExemption, MemberPayment, MembershipFee,
    Subscription,
  },
  gedcom::{Citation, Family, FamilyChild, Individual, Media, Note, Participation, Source},
  registry::{
    Currency, GedcomPersonLink, Member, Membership, Mosque, MosqueCurrency, Person,
  },
  store::{AppliedChangeset, MosqueStore},
};

use crate::{
  Error, Result,
  encode::{
    RawChangeset, RawCitation, RawContributionType, RawDonation, RawExchangeRate,
    RawExemption, RawFamily, RawFamilyChild, RawFee, RawIndividual, RawMedia,
    RawMember, RawMembership, RawNote, RawObligation, RawParticipation, RawPayment,
    RawPerson, RawPersonLink, RawRow, RawSubscription,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A mosque registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// The tenant filter parameter: `NULL` disables the filter.
fn tenant(scope: TenantScope) -> Value {
  scope.mosque_id().map_or(Value::Null, |id| Value::Integer(id.0))
}

fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    let version: i64 = self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
      })
      .await?;
    tracing::debug!(version, "schema ready");
    Ok(())
  }

  /// Run `f` inside one SQLite transaction.
  ///
  /// The transaction commits if `f` returns `Ok` and rolls back otherwise;
  /// `f`'s error is handed back unchanged.
  pub async fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
  where
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<Error> + Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match f(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          // Dropping `tx` rolls it back.
          Err(e) => Ok(Err(e)),
        }
      })
      .await
      .map_err(|e| E::from(Error::Database(e)))?;
    outcome
  }

  async fn fetch_all<R: RawRow>(
    &self,
    sql: String,
    params: Vec<Value>,
  ) -> Result<Vec<R::Domain>> {
    let raws: Vec<R> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), R::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(R::into_domain).collect()
  }

  async fn fetch_one<R: RawRow>(
    &self,
    sql: String,
    params: Vec<Value>,
  ) -> Result<Option<R::Domain>> {
    let raw: Option<R> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), R::read)
            .optional()?,
        )
      })
      .await?;

    raw.map(R::into_domain).transpose()
  }
}

// ─── MosqueStore impl ────────────────────────────────────────────────────────

impl MosqueStore for SqliteStore {
  type Error = Error;

  // ── Genealogy ─────────────────────────────────────────────────────────────

  async fn get_individual(
    &self,
    scope: TenantScope,
    id: &str,
  ) -> Result<Option<Individual>> {
    let sql = format!(
      "SELECT {} FROM gedcom_individuals i
       WHERE i.id = ?1 AND (?2 IS NULL OR i.mosque_id = ?2)",
      RawIndividual::COLUMNS
    );
    self.fetch_one::<RawIndividual>(sql, vec![text(id), tenant(scope)]).await
  }

  async fn list_individuals(&self, scope: TenantScope) -> Result<Vec<Individual>> {
    let sql = format!(
      "SELECT {} FROM gedcom_individuals i
       WHERE (?1 IS NULL OR i.mosque_id = ?1)
       ORDER BY i.id",
      RawIndividual::COLUMNS
    );
    self.fetch_all::<RawIndividual>(sql, vec![tenant(scope)]).await
  }

  async fn get_family(&self, scope: TenantScope, id: &str) -> Result<Option<Family>> {
    let sql = format!(
      "SELECT {} FROM gedcom_families f
       WHERE f.id = ?1 AND (?2 IS NULL OR f.mosque_id = ?2)",
      RawFamily::COLUMNS
    );
    self.fetch_one::<RawFamily>(sql, vec![text(id), tenant(scope)]).await
  }

  async fn family_children(
    &self,
    scope: TenantScope,
    family_id: &str,
  ) -> Result<Vec<FamilyChild>> {
    let sql = format!(
      "SELECT {} FROM gedcom_family_children fc
       WHERE fc.family_id = ?1 AND (?2 IS NULL OR fc.mosque_id = ?2)
       ORDER BY fc.birth_order IS NULL, fc.birth_order, fc.id",
      RawFamilyChild::COLUMNS
    );
    self
      .fetch_all::<RawFamilyChild>(sql, vec![text(family_id), tenant(scope)])
      .await
  }

  async fn parent_families(
    &self,
    scope: TenantScope,
    child_id: &str,
  ) -> Result<Vec<Family>> {
    let sql = format!(
      "SELECT {} FROM gedcom_families f
       JOIN gedcom_family_children fc ON fc.family_id = f.id
       WHERE fc.child_id = ?1
         AND (?2 IS NULL OR f.mosque_id = ?2)
         AND (?2 IS NULL OR fc.mosque_id = ?2)
       ORDER BY f.id",
      RawFamily::COLUMNS
    );
    self.fetch_all::<RawFamily>(sql, vec![text(child_id), tenant(scope)]).await
  }

  async fn spouse_families(
    &self,
    scope: TenantScope,
    individual_id: &str,
  ) -> Result<Vec<Family>> {
    let sql = format!(
      "SELECT {} FROM gedcom_families f
       WHERE (f.husband_id = ?1 OR f.wife_id = ?1)
         AND (?2 IS NULL OR f.mosque_id = ?2)
       ORDER BY f.marriage_date IS NULL, f.marriage_date, f.id",
      RawFamily::COLUMNS
    );
    self
      .fetch_all::<RawFamily>(sql, vec![text(individual_id), tenant(scope)])
      .await
  }

  async fn individual_events(
    &self,
    scope: TenantScope,
    individual_id: &str,
  ) -> Result<Vec<Participation>> {
    // Participants have no tenant column; they are scoped by their event.
    let sql = format!(
      "SELECT {} FROM gedcom_events e
       JOIN gedcom_event_participants ep ON ep.event_id = e.id
       WHERE ep.individual_id = ?1 AND (?2 IS NULL OR e.mosque_id = ?2)
       ORDER BY e.date IS NULL, e.date, e.id",
      RawParticipation::COLUMNS
    );
    self
      .fetch_all::<RawParticipation>(sql, vec![text(individual_id), tenant(scope)])
      .await
  }

  async fn event_citations(
    &self,
    scope: TenantScope,
    event_id: i64,
  ) -> Result<Vec<Citation>> {
    let sql = format!(
      "SELECT {} FROM gedcom_citations c
       JOIN gedcom_events e ON e.id = c.event_id
       WHERE c.event_id = ?1 AND (?2 IS NULL OR e.mosque_id = ?2)
       ORDER BY c.id",
      RawCitation::COLUMNS
    );
    self
      .fetch_all::<RawCitation>(sql, vec![Value::Integer(event_id), tenant(scope)])
      .await
  }

  async fn notes_for(
    &self,
    scope: TenantScope,
    entity_type: EntityType,
    entity_id: &str,
  ) -> Result<Vec<Note>> {
    let sql = format!(
      "SELECT {} FROM gedcom_notes n
       JOIN gedcom_note_links nl ON nl.note_id = n.id
       WHERE nl.entity_type = ?1 AND nl.entity_id = ?2
         AND (?3 IS NULL OR n.mosque_id = ?3)
       ORDER BY n.id",
      RawNote::COLUMNS
    );
    self
      .fetch_all::<RawNote>(
        sql,
        vec![text(entity_type.as_str()), text(entity_id), tenant(scope)],
      )
      .await
  }

  async fn get_source(&self, scope: TenantScope, id: &str) -> Result<Option<Source>> {
    let sql = format!(
      "SELECT {} FROM gedcom_sources s
       WHERE s.id = ?1 AND (?2 IS NULL OR s.mosque_id = ?2)",
      Source::COLUMNS
    );
    self.fetch_one::<Source>(sql, vec![text(id), tenant(scope)]).await
  }

  async fn get_media(&self, scope: TenantScope, id: &str) -> Result<Option<Media>> {
    let sql = format!(
      "SELECT {} FROM gedcom_media m
       WHERE m.id = ?1 AND (?2 IS NULL OR m.mosque_id = ?2)",
      RawMedia::COLUMNS
    );
    self.fetch_one::<RawMedia>(sql, vec![text(id), tenant(scope)]).await
  }

  // ── Registry ──────────────────────────────────────────────────────────────

  async fn list_mosques(&self) -> Result<Vec<Mosque>> {
    let sql = format!("SELECT {} FROM mosques mo ORDER BY mo.id", Mosque::COLUMNS);
    self.fetch_all::<Mosque>(sql, vec![]).await
  }

  async fn list_currencies(&self) -> Result<Vec<Currency>> {
    let sql =
      format!("SELECT {} FROM currencies cu ORDER BY cu.code", Currency::COLUMNS);
    self.fetch_all::<Currency>(sql, vec![]).await
  }

  async fn mosque_currencies(&self, scope: TenantScope) -> Result<Vec<MosqueCurrency>> {
    let sql = format!(
      "SELECT {} FROM mosque_currencies mc
       WHERE (?1 IS NULL OR mc.mosque_id = ?1)
       ORDER BY mc.mosque_id, mc.is_primary DESC, mc.id",
      MosqueCurrency::COLUMNS
    );
    self.fetch_all::<MosqueCurrency>(sql, vec![tenant(scope)]).await
  }

  async fn get_person(&self, scope: TenantScope, id: i64) -> Result<Option<Person>> {
    let sql = format!(
      "SELECT {} FROM persons p
       WHERE p.id = ?1 AND (?2 IS NULL OR p.mosque_id = ?2)",
      RawPerson::COLUMNS
    );
    self.fetch_one::<RawPerson>(sql, vec![Value::Integer(id), tenant(scope)]).await
  }

  async fn list_persons(&self, scope: TenantScope) -> Result<Vec<Person>> {
    let sql = format!(
      "SELECT {} FROM persons p
       WHERE (?1 IS NULL OR p.mosque_id = ?1)
       ORDER BY p.last_name, p.first_name, p.id",
      RawPerson::COLUMNS
    );
    self.fetch_all::<RawPerson>(sql, vec![tenant(scope)]).await
  }

  async fn person_memberships(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> Result<Vec<Membership>> {
    let sql = format!(
      "SELECT {} FROM memberships ms
       WHERE ms.person_id = ?1 AND (?2 IS NULL OR ms.mosque_id = ?2)
       ORDER BY ms.start_date, ms.id",
      RawMembership::COLUMNS
    );
    self
      .fetch_all::<RawMembership>(sql, vec![Value::Integer(person_id), tenant(scope)])
      .await
  }

  async fn person_link(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> Result<Option<GedcomPersonLink>> {
    let sql = format!(
      "SELECT {} FROM gedcom_person_links gl
       WHERE gl.person_id = ?1 AND (?2 IS NULL OR gl.mosque_id = ?2)",
      RawPersonLink::COLUMNS
    );
    self
      .fetch_one::<RawPersonLink>(sql, vec![Value::Integer(person_id), tenant(scope)])
      .await
  }

  async fn list_members(&self, scope: TenantScope) -> Result<Vec<Member>> {
    let sql = format!(
      "SELECT {} FROM members mb
       WHERE (?1 IS NULL OR mb.mosque_id = ?1)
       ORDER BY mb.id",
      RawMember::COLUMNS
    );
    self.fetch_all::<RawMember>(sql, vec![tenant(scope)]).await
  }

  // ── Finance ───────────────────────────────────────────────────────────────

  async fn list_contribution_types(
    &self,
    scope: TenantScope,
  ) -> Result<Vec<ContributionType>> {
    let sql = format!(
      "SELECT {} FROM contribution_types ct
       WHERE (?1 IS NULL OR ct.mosque_id = ?1)
       ORDER BY ct.code, ct.id",
      RawContributionType::COLUMNS
    );
    self.fetch_all::<RawContributionType>(sql, vec![tenant(scope)]).await
  }

  async fn contribution_type_translations(
    &self,
    scope: TenantScope,
    contribution_type_id: i64,
  ) -> Result<Vec<ContributionTypeTranslation>> {
    let sql = format!(
      "SELECT {} FROM contribution_type_translations ctt
       JOIN contribution_types ct ON ct.id = ctt.contribution_type_id
       WHERE ctt.contribution_type_id = ?1 AND (?2 IS NULL OR ct.mosque_id = ?2)
       ORDER BY ctt.locale",
      ContributionTypeTranslation::COLUMNS
    );
    self
      .fetch_all::<ContributionTypeTranslation>(
        sql,
        vec![Value::Integer(contribution_type_id), tenant(scope)],
      )
      .await
  }

  async fn contribution_obligations(
    &self,
    scope: TenantScope,
    contribution_type_id: i64,
  ) -> Result<Vec<ContributionObligation>> {
    let sql = format!(
      "SELECT {} FROM contribution_obligations co
       WHERE co.contribution_type_id = ?1 AND (?2 IS NULL OR co.mosque_id = ?2)
       ORDER BY co.start_date, co.id",
      RawObligation::COLUMNS
    );
    self
      .fetch_all::<RawObligation>(
        sql,
        vec![Value::Integer(contribution_type_id), tenant(scope)],
      )
      .await
  }

  async fn person_exemptions(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> Result<Vec<MemberContributionExemption>> {
    let sql = format!(
      "SELECT {} FROM member_contribution_exemptions ex
       WHERE ex.person_id = ?1 AND (?2 IS NULL OR ex.mosque_id = ?2)
       ORDER BY ex.start_date, ex.id",
      RawExemption::COLUMNS
    );
    self
      .fetch_all::<RawExemption>(sql, vec![Value::Integer(person_id), tenant(scope)])
      .await
  }

  async fn person_payments(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> Result<Vec<MemberPayment>> {
    let sql = format!(
      "SELECT {} FROM member_payments pa
       WHERE pa.person_id = ?1 AND (?2 IS NULL OR pa.mosque_id = ?2)
       ORDER BY pa.payment_date, pa.id",
      RawPayment::COLUMNS
    );
    self
      .fetch_all::<RawPayment>(sql, vec![Value::Integer(person_id), tenant(scope)])
      .await
  }

  async fn member_fees(
    &self,
    scope: TenantScope,
    member_id: i64,
  ) -> Result<Vec<MembershipFee>> {
    let sql = format!(
      "SELECT {} FROM membership_fees fe
       JOIN members mb ON mb.id = fe.member_id
       WHERE fe.member_id = ?1 AND (?2 IS NULL OR mb.mosque_id = ?2)
       ORDER BY fe.due_date, fe.id",
      RawFee::COLUMNS
    );
    self
      .fetch_all::<RawFee>(sql, vec![Value::Integer(member_id), tenant(scope)])
      .await
  }

  async fn person_donations(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> Result<Vec<Donation>> {
    let sql = format!(
      "SELECT {} FROM donations d
       WHERE d.person_id = ?1 AND (?2 IS NULL OR d.mosque_id = ?2)
       ORDER BY d.donation_date, d.id",
      RawDonation::COLUMNS
    );
    self
      .fetch_all::<RawDonation>(sql, vec![Value::Integer(person_id), tenant(scope)])
      .await
  }

  async fn person_subscriptions(
    &self,
    scope: TenantScope,
    person_id: i64,
  ) -> Result<Vec<Subscription>> {
    let sql = format!(
      "SELECT {} FROM subscriptions sb
       JOIN persons p ON p.id = sb.person_id
       WHERE sb.person_id = ?1 AND (?2 IS NULL OR p.mosque_id = ?2)
       ORDER BY sb.id",
      RawSubscription::COLUMNS
    );
    self
      .fetch_all::<RawSubscription>(sql, vec![Value::Integer(person_id), tenant(scope)])
      .await
  }

  async fn exchange_rates(
    &self,
    scope: TenantScope,
    from_currency_id: i64,
    to_currency_id: i64,
  ) -> Result<Vec<ExchangeRate>> {
    let sql = format!(
      "SELECT {} FROM exchange_rates xr
       WHERE xr.from_currency_id = ?1 AND xr.to_currency_id = ?2
         AND (?3 IS NULL OR xr.mosque_id = ?3)
       ORDER BY xr.effective_date DESC, xr.id DESC",
      RawExchangeRate::COLUMNS
    );
    self
      .fetch_all::<RawExchangeRate>(
        sql,
        vec![
          Value::Integer(from_currency_id),
          Value::Integer(to_currency_id),
          tenant(scope),
        ],
      )
      .await
  }

  // ── Access ────────────────────────────────────────────────────────────────

  async fn list_roles(&self) -> Result<Vec<Role>> {
    let sql = format!("SELECT {} FROM roles r ORDER BY r.name", Role::COLUMNS);
    self.fetch_all::<Role>(sql, vec![]).await
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let sql = format!("SELECT {} FROM users u ORDER BY u.username", User::COLUMNS);
    self.fetch_all::<User>(sql, vec![]).await
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users u WHERE u.username = ?1", User::COLUMNS);
    self.fetch_one::<User>(sql, vec![text(username)]).await
  }

  async fn user_roles(&self, user_id: i64) -> Result<Vec<Role>> {
    let sql = format!(
      "SELECT {} FROM roles r
       JOIN user_roles ur ON ur.role_id = r.id
       WHERE ur.user_id = ?1
       ORDER BY r.name",
      Role::COLUMNS
    );
    self.fetch_all::<Role>(sql, vec![Value::Integer(user_id)]).await
  }

  async fn role_permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
    let sql = format!(
      "SELECT {} FROM permissions pm
       JOIN role_assignable_permissions rap ON rap.permission_id = pm.id
       WHERE rap.role_id = ?1
       ORDER BY pm.code",
      Permission::COLUMNS
    );
    self.fetch_all::<Permission>(sql, vec![Value::Integer(role_id)]).await
  }

  // ── Migrations ────────────────────────────────────────────────────────────

  async fn list_changesets(&self) -> Result<Vec<AppliedChangeset>> {
    let sql = format!(
      "SELECT {} FROM applied_changesets ac ORDER BY ac.rowid",
      RawChangeset::COLUMNS
    );
    self.fetch_all::<RawChangeset>(sql, vec![]).await
  }
}
