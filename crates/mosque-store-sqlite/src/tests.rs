//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use mosque_core::{
  MosqueId, TenantScope,
  enums::{
    ContributionFrequency, DonationType, EntityType, EventType, ParticipantRole,
    PaymentMethod, RelationshipType, SubscriptionStatus,
  },
  finance::{rate_on, translation},
  relatives::relatives,
  store::{AppliedChangeset, MosqueStore},
};

use rust_decimal::Decimal;

use crate::{Error, SqliteStore, ledger};

const M1: TenantScope = TenantScope::Mosque(MosqueId(1));
const M2: TenantScope = TenantScope::Mosque(MosqueId(2));

/// Two mosques. Mosque 1 holds a three-generation family; mosque 2 holds a
/// single individual with an event.
const FIXTURE: &str = "
INSERT INTO mosques (id, name, city) VALUES (1, 'Masjid An-Nour', 'Utrecht');
INSERT INTO mosques (id, name, active) VALUES (2, 'Masjid Al-Fath', 0);

INSERT INTO gedcom_individuals (id, given_name, surname, sex, birth_date, mosque_id) VALUES
  ('@I1@', 'Yusuf',   'Hassan', 'M', '1950-02-01', 1),
  ('@I2@', 'Amina',   'Hassan', 'F', '1955-07-12', 1),
  ('@I3@', 'Ibrahim', 'Hassan', 'M', '1980-01-01', 1),
  ('@I4@', 'Maryam',  'Hassan', 'F', '1978-04-30', 1),
  ('@I5@', 'Khadija', 'Omar',   'F', '1982-09-09', 1),
  ('@I6@', 'Bilal',   'Hassan', 'M', '2010-03-03', 1),
  ('@I9@', 'Tariq',   NULL,     'U', NULL,         2);

INSERT INTO gedcom_families (id, husband_id, wife_id, marriage_date, mosque_id) VALUES
  ('@F1@', '@I1@', '@I2@', '1975-06-01', 1),
  ('@F2@', '@I3@', '@I5@', '2008-05-05', 1);

INSERT INTO gedcom_family_children (family_id, child_id, relationship_type, birth_order, mosque_id) VALUES
  ('@F1@', '@I3@', 'ADOPTED',    2,    1),
  ('@F1@', '@I4@', 'BIOLOGICAL', 1,    1),
  ('@F2@', '@I6@', 'BIOLOGICAL', NULL, 1);

INSERT INTO gedcom_events (id, type, date, place, family_id, mosque_id) VALUES
  (1, 'BIRT', '1980-01-01', 'Rabat',   NULL,   1),
  (2, 'MARR', '1975-06-01', 'Tangier', '@F1@', 1),
  (3, 'RESI', NULL,         NULL,      NULL,   1),
  (9, 'BIRT', '1990-10-10', NULL,      NULL,   2);

INSERT INTO gedcom_event_participants (event_id, individual_id, role) VALUES
  (1, '@I3@', 'PRINCIPAL'),
  (1, '@I1@', 'WITNESS'),
  (2, '@I1@', 'PRINCIPAL'),
  (2, '@I2@', 'PRINCIPAL'),
  (3, '@I1@', 'PRINCIPAL'),
  (9, '@I9@', 'PRINCIPAL');

INSERT INTO gedcom_sources (id, title, repository, mosque_id) VALUES
  ('@S1@', 'Civil register Rabat', 'Archives', 1);

INSERT INTO gedcom_citations (source_id, event_id, page, confidence) VALUES
  ('@S1@', 1, 'p. 12', 'HIGH');

INSERT INTO gedcom_notes (id, text, mosque_id) VALUES
  (1, 'Founding member of the mosque board.', 1),
  (2, 'Moved abroad.', 2);

INSERT INTO gedcom_note_links (note_id, entity_type, entity_id) VALUES
  (1, 'INDI', '@I1@'),
  (2, 'INDI', '@I1@');

INSERT INTO gedcom_media (id, file_path, media_type, file_size, mosque_id) VALUES
  ('@M1@', 'photos/wedding.jpg', 'PHOTO', 20480, 1);

INSERT INTO persons (id, first_name, last_name, date_of_birth, status, created_at, updated_at, mosque_id) VALUES
  (1, 'Yusuf', 'Hassan', '1950-02-01', 'ACTIVE', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00', 1),
  (2, 'Tariq', NULL,     NULL,         'ACTIVE', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00', 2);

INSERT INTO memberships (person_id, membership_type, start_date, end_date, created_at, updated_at, mosque_id) VALUES
  (1, 'SENIOR', '2020-01-01', NULL,         '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00', 1),
  (1, 'FULL',   '2010-01-01', '2019-12-31', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00', 1);

INSERT INTO gedcom_person_links (person_id, gedcom_individual_id, linked_by, linked_at, updated_at, mosque_id) VALUES
  (1, '@I1@', 'admin', '2024-01-02T00:00:00+00:00', '2024-01-02T00:00:00+00:00', 1);

INSERT INTO members (id, individual_id, created_at, updated_at, mosque_id) VALUES
  (1, '@I1@', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00', 1);

INSERT INTO currencies (id, code, name) VALUES (1, 'EUR', 'Euro'), (2, 'SRD', 'Surinamese dollar');

INSERT INTO contribution_types (id, code, is_required, created_at, mosque_id) VALUES
  (1, 'DUES',     1, '2024-01-01T00:00:00+00:00', 1),
  (2, 'BUILDING', 0, '2024-01-01T00:00:00+00:00', 2);
INSERT INTO contribution_type_translations (contribution_type_id, locale, name) VALUES
  (1, 'nl', 'Contributie'),
  (1, 'en', 'Monthly dues'),
  (2, 'en', 'Building fund');
INSERT INTO contribution_obligations (id, contribution_type_id, amount, frequency, start_date, currency_id, mosque_id) VALUES
  (1, 1, '35.00', 'MONTHLY', '2024-01-01', 1, 1);
INSERT INTO member_contribution_exemptions (id, person_id, contribution_type_id, exemption_type, amount, start_date, mosque_id) VALUES
  (1, 1, 1, 'DISCOUNT_PERCENTAGE', '50', '2024-01-01', 1);
INSERT INTO member_payments (id, person_id, contribution_type_id, amount, payment_date, created_at, mosque_id) VALUES
  (1, 1, 1, '17.50', '2024-02-01', '2024-02-01T10:00:00+00:00', 1),
  (2, 1, 1, '17.50', '2024-01-01', '2024-01-01T10:00:00+00:00', 1);
INSERT INTO membership_fees (id, member_id, amount, due_date, status, payment_method) VALUES
  (1, 1, '35', '2024-01-31', 'PAID',    'BANK_TRANSFER'),
  (2, 1, '35', '2024-02-29', 'PENDING', NULL);
INSERT INTO donations (id, person_id, amount, donation_type, donation_date, created_at, mosque_id) VALUES
  (1, 1, '100', 'ZAKAT', '2024-04-01', '2024-04-01T00:00:00+00:00', 1),
  (2, 2, '20',  'SADAQAH', '2024-04-02', '2024-04-02T00:00:00+00:00', 2);
INSERT INTO subscriptions (person_id, frequency) VALUES (1, 'MONTHLY');
INSERT INTO exchange_rates (from_currency_id, to_currency_id, rate, effective_date, mosque_id) VALUES
  (1, 2, '38.50', '2024-01-01', 1),
  (1, 2, '40.25', '2024-06-01', 1),
  (1, 2, '39',    '2024-03-01', 2);

INSERT INTO roles (id, name) VALUES (1, 'ADMIN'), (2, 'MEMBER');
INSERT INTO permissions (id, code, category) VALUES
  (1, 'member.view', 'members'),
  (2, 'member.edit', 'members');
INSERT INTO role_assignable_permissions (role_id, permission_id) VALUES (1, 1), (1, 2), (2, 1);
INSERT INTO users (id, username, password, account_enabled) VALUES (1, 'admin', '$argon2id$stub', 1);
INSERT INTO user_roles (user_id, role_id) VALUES (1, 1), (1, 2);
";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seeded() -> SqliteStore {
  let s = store().await;
  s.transaction(|tx| tx.execute_batch(FIXTURE).map_err(Error::from))
    .await
    .expect("fixture");
  s
}

fn ids<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
  items.into_iter().collect()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_init_is_idempotent() {
  let s = seeded().await;
  s.init_schema().await.unwrap();
  assert_eq!(s.list_individuals(TenantScope::All).await.unwrap().len(), 7);
}

#[tokio::test]
async fn undeclared_enum_value_is_rejected() {
  let s = seeded().await;
  let err = s
    .transaction(|tx| {
      tx.execute(
        "INSERT INTO gedcom_family_children (family_id, child_id, relationship_type)
         VALUES ('@F2@', '@I4@', 'STEP')",
        [],
      )?;
      Ok::<_, Error>(())
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Sqlite(_)));
}

#[tokio::test]
async fn failed_transaction_leaves_no_writes() {
  let s = seeded().await;
  let result = s
    .transaction(|tx| {
      tx.execute(
        "INSERT INTO gedcom_individuals (id, given_name, mosque_id) VALUES ('@I7@', 'Zaid', 1)",
        [],
      )?;
      // Unknown family: violates the foreign key.
      tx.execute(
        "INSERT INTO gedcom_family_children (family_id, child_id) VALUES ('@F9@', '@I7@')",
        [],
      )?;
      Ok::<_, Error>(())
    })
    .await;
  assert!(result.is_err());
  assert!(s.get_individual(M1, "@I7@").await.unwrap().is_none());
}

// ─── Tenant scoping ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reads_are_filtered_by_tenant() {
  let s = seeded().await;

  let m1 = s.list_individuals(M1).await.unwrap();
  assert_eq!(m1.len(), 6);
  assert!(m1.iter().all(|i| i.mosque_id == Some(MosqueId(1))));

  let m2 = s.list_individuals(M2).await.unwrap();
  assert_eq!(ids(m2.iter().map(|i| i.id.as_str())), vec!["@I9@"]);

  assert!(s.get_individual(M2, "@I1@").await.unwrap().is_none());
  assert!(s.get_individual(TenantScope::All, "@I9@").await.unwrap().is_some());
}

#[tokio::test]
async fn super_admin_sees_every_tenant() {
  let s = seeded().await;
  let all = s.list_persons(TenantScope::All).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(s.list_persons(M1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn join_rows_are_scoped_through_their_parent() {
  let s = seeded().await;
  // Note 2 is linked to @I1@ but belongs to mosque 2.
  let notes = s.notes_for(M1, EntityType::Individual, "@I1@").await.unwrap();
  assert_eq!(notes.len(), 1);
  assert_eq!(notes[0].text, "Founding member of the mosque board.");

  let all = s
    .notes_for(TenantScope::All, EntityType::Individual, "@I1@")
    .await
    .unwrap();
  assert_eq!(all.len(), 2);

  assert!(s.individual_events(M2, "@I1@").await.unwrap().is_empty());
}

// ─── Genealogy ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn individual_decodes_all_columns() {
  let s = seeded().await;
  let i = s.get_individual(M1, "@I2@").await.unwrap().unwrap();
  assert_eq!(i.display_name(), "Amina Hassan");
  assert_eq!(i.birth_date, NaiveDate::from_ymd_opt(1955, 7, 12));
  assert!(i.living);
}

#[tokio::test]
async fn family_children_by_birth_order() {
  let s = seeded().await;
  let children = s.family_children(M1, "@F1@").await.unwrap();
  assert_eq!(
    ids(children.iter().map(|c| c.child_id.as_str())),
    vec!["@I4@", "@I3@"]
  );
  assert_eq!(children[1].relationship_type, RelationshipType::Adopted);
}

#[tokio::test]
async fn parent_and_spouse_families() {
  let s = seeded().await;

  let parents = s.parent_families(M1, "@I3@").await.unwrap();
  assert_eq!(ids(parents.iter().map(|f| f.id.as_str())), vec!["@F1@"]);

  let spouse = s.spouse_families(M1, "@I3@").await.unwrap();
  assert_eq!(ids(spouse.iter().map(|f| f.id.as_str())), vec!["@F2@"]);
  assert_eq!(spouse[0].partner_of("@I3@"), Some("@I5@"));
}

#[tokio::test]
async fn events_by_date_with_roles() {
  let s = seeded().await;
  let events = s.individual_events(M1, "@I1@").await.unwrap();
  let seen: Vec<_> = events.iter().map(|p| (p.event.event_type, p.role)).collect();
  assert_eq!(
    seen,
    vec![
      (EventType::Marriage, ParticipantRole::Principal),
      (EventType::Birth, ParticipantRole::Witness),
      (EventType::Residence, ParticipantRole::Principal),
    ]
  );
  assert_eq!(events[0].event.family_id.as_deref(), Some("@F1@"));
}

#[tokio::test]
async fn citations_sources_and_media() {
  let s = seeded().await;

  let citations = s.event_citations(M1, 1).await.unwrap();
  assert_eq!(citations.len(), 1);
  let source = s.get_source(M1, &citations[0].source_id).await.unwrap().unwrap();
  assert_eq!(source.title, "Civil register Rabat");
  assert!(s.event_citations(M2, 1).await.unwrap().is_empty());

  let media = s.get_media(M1, "@M1@").await.unwrap().unwrap();
  assert_eq!(media.file_size, Some(20480));
  assert!(s.get_media(M2, "@M1@").await.unwrap().is_none());
}

#[tokio::test]
async fn relatives_of_middle_generation() {
  let s = seeded().await;
  let r = relatives(&s, M1, "@I3@").await.unwrap().unwrap();

  assert_eq!(ids(r.parents.iter().map(|i| i.id.as_str())), vec!["@I1@", "@I2@"]);
  assert_eq!(ids(r.siblings.iter().map(|i| i.id.as_str())), vec!["@I4@"]);
  assert_eq!(r.spouses.len(), 1);
  assert_eq!(r.spouses[0].individual.id, "@I5@");
  assert_eq!(r.spouses[0].family_id, "@F2@");
  assert_eq!(ids(r.children.iter().map(|c| c.individual.id.as_str())), vec!["@I6@"]);
}

#[tokio::test]
async fn relatives_outside_scope() {
  let s = seeded().await;
  assert!(relatives(&s, M2, "@I3@").await.unwrap().is_none());

  let r = relatives(&s, M1, "@I1@").await.unwrap().unwrap();
  assert!(r.parents.is_empty());
  assert_eq!(
    ids(r.children.iter().map(|c| c.individual.id.as_str())),
    vec!["@I4@", "@I3@"]
  );
}

// ─── Registry and access ─────────────────────────────────────────────────────

#[tokio::test]
async fn person_memberships_and_link() {
  let s = seeded().await;
  let person = s.get_person(M1, 1).await.unwrap().unwrap();
  assert_eq!(person.first_name, "Yusuf");

  let memberships = s.person_memberships(M1, 1).await.unwrap();
  assert_eq!(memberships.len(), 2);
  let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
  assert_eq!(memberships.iter().filter(|m| m.is_current(today)).count(), 1);

  let link = s.person_link(M1, 1).await.unwrap().unwrap();
  assert_eq!(link.gedcom_individual_id, "@I1@");
  assert!(s.person_link(M2, 1).await.unwrap().is_none());
}

#[tokio::test]
async fn mosques_and_defaults() {
  let s = seeded().await;
  let mosques = s.list_mosques().await.unwrap();
  assert_eq!(mosques.len(), 2);
  assert!(mosques[0].active);
  assert!(!mosques[1].active);
}

#[tokio::test]
async fn users_roles_and_permissions() {
  let s = seeded().await;
  let admin = s.find_user_by_username("admin").await.unwrap().unwrap();
  assert!(admin.can_log_in());

  let roles = s.user_roles(admin.id).await.unwrap();
  assert_eq!(
    roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
    vec!["ADMIN", "MEMBER"]
  );

  let perms = s.role_permissions(roles[0].id).await.unwrap();
  assert_eq!(
    perms.iter().map(|p| p.code.as_str()).collect::<Vec<_>>(),
    vec!["member.edit", "member.view"]
  );
  assert!(s.find_user_by_username("nobody").await.unwrap().is_none());
}

// ─── Finance ─────────────────────────────────────────────────────────────────

fn dec(s: &str) -> Decimal { s.parse().unwrap() }

#[tokio::test]
async fn contribution_types_with_translations() {
  let s = seeded().await;
  let types = s.list_contribution_types(M1).await.unwrap();
  assert_eq!(types.len(), 1);
  assert!(types[0].is_required && types[0].is_active);

  let translations = s.contribution_type_translations(M1, 1).await.unwrap();
  assert_eq!(
    ids(translations.iter().map(|t| t.locale.as_str())),
    vec!["en", "nl"]
  );
  assert_eq!(translation(&translations, "ar").unwrap().name, "Monthly dues");
  assert!(s.contribution_type_translations(M1, 2).await.unwrap().is_empty());
  assert_eq!(s.list_contribution_types(TenantScope::All).await.unwrap().len(), 2);
}

#[tokio::test]
async fn amount_due_after_exemption() {
  let s = seeded().await;
  let obligation = &s.contribution_obligations(M1, 1).await.unwrap()[0];
  assert_eq!(obligation.amount, dec("35.00"));
  assert_eq!(obligation.frequency, ContributionFrequency::Monthly);

  let exemptions = s.person_exemptions(M1, 1).await.unwrap();
  let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
  let active: Vec<_> = exemptions.iter().filter(|e| e.is_active_on(day)).collect();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].apply(obligation.amount), dec("17.5"));
  assert!(s.person_exemptions(M2, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn payments_fees_and_donations() {
  let s = seeded().await;
  let payments = s.person_payments(M1, 1).await.unwrap();
  assert_eq!(payments.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
  assert_eq!(payments.iter().map(|p| p.amount).sum::<Decimal>(), dec("35"));

  let fees = s.member_fees(M1, 1).await.unwrap();
  assert_eq!(fees.len(), 2);
  assert!(fees[0].is_paid());
  assert_eq!(fees[0].payment_method, Some(PaymentMethod::BankTransfer));
  assert!(fees[1].is_overdue(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
  assert!(s.member_fees(M2, 1).await.unwrap().is_empty());

  let donations = s.person_donations(M1, 1).await.unwrap();
  assert_eq!(donations.len(), 1);
  assert_eq!(donations[0].donation_type, DonationType::Zakat);
  assert!(!donations[0].anonymous);
  assert!(s.person_donations(M1, 2).await.unwrap().is_empty());

  let subs = s.person_subscriptions(M1, 1).await.unwrap();
  assert_eq!(subs[0].status, SubscriptionStatus::Active);
  assert!(s.person_subscriptions(M2, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn exchange_rates_newest_first() {
  let s = seeded().await;
  let rates = s.exchange_rates(M1, 1, 2).await.unwrap();
  assert_eq!(
    rates.iter().map(|r| r.rate).collect::<Vec<_>>(),
    vec![dec("40.25"), dec("38.50")]
  );
  let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
  assert_eq!(rate_on(&rates, march).unwrap().convert(dec("2")), dec("77"));
  assert_eq!(s.exchange_rates(TenantScope::All, 1, 2).await.unwrap().len(), 3);
  assert!(s.exchange_rates(M1, 2, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn finance_checks_are_enforced() {
  let s = seeded().await;
  for sql in [
    "INSERT INTO member_payments (person_id, contribution_type_id, amount, payment_date, created_at)
     VALUES (1, 1, '0', '2024-01-01', '2024-01-01T00:00:00+00:00')",
    "INSERT INTO exchange_rates (from_currency_id, to_currency_id, rate, effective_date)
     VALUES (1, 1, '1', '2024-01-01')",
    "INSERT INTO donations (person_id, amount, donation_type, donation_date, created_at)
     VALUES (1, '5', 'TITHE', '2024-01-01', '2024-01-01T00:00:00+00:00')",
  ] {
    let err = s
      .transaction(move |tx| tx.execute(sql, []).map_err(Error::from))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Sqlite(_)), "{sql}");
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ledger_records_and_refreshes() {
  let s = store().await;
  let entry = AppliedChangeset {
    id:         "001-mosques".into(),
    author:     Some("seed".into()),
    checksum:   "aa".into(),
    applied_at: Utc::now(),
    row_count:  3,
  };

  let first = entry.clone();
  s.transaction(move |tx| ledger::record(tx, &first).map_err(Error::from))
    .await
    .unwrap();

  let refreshed = AppliedChangeset { checksum: "bb".into(), ..entry };
  s.transaction(move |tx| {
    let old = ledger::applied_checksum(tx, &refreshed.id)?;
    assert_eq!(old.as_deref(), Some("aa"));
    ledger::record(tx, &refreshed)?;
    Ok::<_, Error>(())
  })
  .await
  .unwrap();

  let all = s.list_changesets().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].checksum, "bb");
  assert_eq!(all[0].row_count, 3);
}
