//! Integration tests for the migration runner against an in-memory store.

use mosque_core::{
  MosqueId, TenantScope,
  enums::{EntityType, RelationshipType}, registry::person_fingerprint,
  relatives::relatives, store::MosqueStore,
};
use mosque_store_sqlite::SqliteStore;

use crate::{
  Changelog, Error, RoleDump,
  coerce::legacy_string_hash,
  report::Status,
  runner::{self, run},
};

const M1: TenantScope = TenantScope::Mosque(MosqueId(1));
const M2: TenantScope = TenantScope::Mosque(MosqueId(2));

const SAMPLE: &str = include_str!("../seed/changelog.toml");

/// Two mosques, shared by most tests.
const MOSQUES: &str = r#"
[[changeset]]
id = "000-mosques"

[[changeset.rows]]
kind = "mosque"
id = 1
name = "Masjid An-Nour"

[[changeset.rows]]
kind = "mosque"
id = 2
name = "Masjid Al-Fath"
active = false
"#;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// A store with [`MOSQUES`] applied.
async fn with_mosques() -> SqliteStore {
  let s = store().await;
  migrate(&s, MOSQUES, TenantScope::All).await.expect("mosques");
  s
}

async fn migrate(
  store: &SqliteStore,
  source: &str,
  scope: TenantScope,
) -> crate::Result<crate::RunReport> {
  run(store, &Changelog::parse(source)?, scope).await
}

// ─── Sample changelog ────────────────────────────────────────────────────────

#[tokio::test]
async fn sample_changelog_applies_cleanly() {
  let s = store().await;
  let report = migrate(&s, SAMPLE, TenantScope::All).await.unwrap();
  assert!(report.changesets.iter().all(|c| c.status == Status::Applied));
  assert!(report.changesets.iter().all(|c| c.updated == 0 && c.unchanged == 0));

  let mosques = s.list_mosques().await.unwrap();
  assert_eq!(mosques.len(), 1);
  assert!(mosques[0].active);

  let currencies = s.list_currencies().await.unwrap();
  assert_eq!(currencies[0].code, "EUR");
  assert_eq!(currencies[0].decimal_places, 2);

  // Stamped from the changeset's mosque_id.
  let enabled = s.mosque_currencies(M1).await.unwrap();
  assert_eq!(enabled.len(), 2);
  assert!(enabled.iter().any(|c| c.is_primary && c.is_active));
  assert!(enabled.iter().any(|c| !c.is_primary && !c.is_active));

  let r = relatives(&s, M1, "@I3@").await.unwrap().unwrap();
  let mut parents: Vec<_> = r.parents.iter().map(|p| p.id.as_str()).collect();
  parents.sort();
  assert_eq!(parents, ["@I1@", "@I2@"]);
  let amina = s.get_individual(M1, "@I2@").await.unwrap().unwrap();
  assert_eq!(amina.sex, Some(mosque_core::enums::Sex::F));

  let applied = s.list_changesets().await.unwrap();
  assert_eq!(applied.len(), report.changesets.len());
  assert!(applied.iter().all(|c| c.checksum.len() == 64));
}

#[tokio::test]
async fn rerunning_unchanged_changelog_applies_nothing() {
  let s = store().await;
  migrate(&s, SAMPLE, TenantScope::All).await.unwrap();
  let before = s.list_changesets().await.unwrap();

  let report = migrate(&s, SAMPLE, TenantScope::All).await.unwrap();
  assert!(report.changesets.iter().all(|c| c.status == Status::Skipped));
  assert_eq!(report.applied().count(), 0);
  assert_eq!(s.list_changesets().await.unwrap(), before);
}

#[tokio::test]
async fn sample_person_is_folded_and_fingerprinted() {
  let s = store().await;
  migrate(&s, SAMPLE, TenantScope::All).await.unwrap();

  let id = i64::from(legacy_string_hash("6f1c2a9e-4b7d-4c1e-9a3f-1d2e3f4a5b6c")).abs();
  let person = s.get_person(M1, id).await.unwrap().unwrap();
  assert_eq!(
    person.hash.as_deref(),
    Some(
      person_fingerprint(
        Some("Yusuf"),
        Some("Hassan"),
        chrono::NaiveDate::from_ymd_opt(1950, 2, 1)
      )
      .as_str()
    )
  );
  assert_eq!(person.created_at, person.updated_at);

  let memberships = s.person_memberships(M1, id).await.unwrap();
  assert_eq!(memberships.len(), 1);
  let link = s.person_link(M1, id).await.unwrap().unwrap();
  assert_eq!(link.gedcom_individual_id, "@I1@");
  assert_eq!(s.list_members(M1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sample_roles_dump() {
  let s = store().await;
  migrate(&s, SAMPLE, TenantScope::All).await.unwrap();

  let dump = RoleDump::collect(&s).await.unwrap();
  assert!(dump.admin_ok());
  assert_eq!(dump.roles.len(), 2);
  let (admin_role, permissions) = &dump.roles[0];
  assert_eq!(admin_role.name, "ADMIN");
  assert_eq!(permissions.len(), 3);
  assert!(dump.to_string().ends_with("admin roles: ADMIN"));
}

// ─── Upsert semantics ────────────────────────────────────────────────────────

const ROLE_V1: &str = r#"
[[changeset]]
id = "roles"
[[changeset.rows]]
kind = "role"
id = 1
name = "ADMIN"
[[changeset.rows]]
kind = "role"
id = 2
name = "MEMBER"
"#;

#[tokio::test]
async fn upserting_same_key_keeps_latest_values() {
  let s = store().await;
  migrate(&s, ROLE_V1, TenantScope::All).await.unwrap();

  let v2 = r#"
    [[changeset]]
    id = "roles"
    run_on_change = true
    [[changeset.rows]]
    kind = "role"
    id = 1
    name = "ADMINISTRATOR"
    [[changeset.rows]]
    kind = "role"
    id = 2
    name = "MEMBER"
  "#;
  let report = migrate(&s, v2, TenantScope::All).await.unwrap();
  let c = &report.changesets[0];
  assert_eq!(c.status, Status::Reapplied);
  assert_eq!((c.inserted, c.updated, c.unchanged), (0, 1, 1));

  let names: Vec<_> =
    s.list_roles().await.unwrap().into_iter().map(|r| r.name).collect();
  assert_eq!(names, ["ADMINISTRATOR", "MEMBER"]);
}

#[tokio::test]
async fn edited_changeset_without_run_on_change_is_an_error() {
  let s = store().await;
  migrate(&s, ROLE_V1, TenantScope::All).await.unwrap();
  let recorded = s.list_changesets().await.unwrap()[0].checksum.clone();

  let edited = ROLE_V1.replace("\"MEMBER\"", "\"GUEST\"");
  let err = migrate(&s, &edited, TenantScope::All).await.unwrap_err();
  assert!(matches!(
    &err,
    Error::ChecksumMismatch { id, recorded: r, .. } if id == "roles" && *r == recorded
  ));
  let names: Vec<_> =
    s.list_roles().await.unwrap().into_iter().map(|r| r.name).collect();
  assert_eq!(names, ["ADMIN", "MEMBER"]);
}

#[tokio::test]
async fn pair_rows_are_inserted_once() {
  let s = store().await;
  let grants = format!(
    "{ROLE_V1}
     [[changeset]]
     id = \"grants\"
     [[changeset.rows]]
     kind = \"permission\"
     id = 1
     code = \"member.view\"
     [[changeset.rows]]
     kind = \"role_assignable_permission\"
     role_id = 1
     permission_id = 1
     [[changeset.rows]]
     kind = \"role_assignable_permission\"
     role_id = \"1\"
     permission_id = \"1\""
  );
  let report = migrate(&s, &grants, TenantScope::All).await.unwrap();
  let c = &report.changesets[1];
  assert_eq!((c.inserted, c.unchanged), (2, 1));
  assert_eq!(s.role_permissions(1).await.unwrap().len(), 1);
}

// ─── Coercion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_numeric_source_becomes_null() {
  let s = with_mosques().await;
  let source = r#"
    [[changeset]]
    id = "family"
    mosque_id = 1
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I1@"
    given_name = "Yusuf"
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I2@"
    given_name = "Bilal"
    [[changeset.rows]]
    kind = "gedcom_family"
    id = "@F1@"
    husband_id = "@I1@"
    [[changeset.rows]]
    kind = "gedcom_family_child"
    family_id = "@F1@"
    child_id = "@I2@"
    birth_order = "  "
    [[changeset.rows]]
    kind = "gedcom_media"
    id = "@M1@"
    file_path = "a.jpg"
    media_type = "photo"
    file_size = ""
  "#;
  migrate(&s, source, TenantScope::All).await.unwrap();

  let children = s.family_children(M1, "@F1@").await.unwrap();
  assert_eq!(children.len(), 1);
  assert_eq!(children[0].birth_order, None);
  assert_eq!(children[0].relationship_type, RelationshipType::Biological);
  let media = s.get_media(M1, "@M1@").await.unwrap().unwrap();
  assert_eq!(media.file_size, None);
}

#[tokio::test]
async fn undeclared_relationship_type_is_rejected() {
  let s = with_mosques().await;
  let source = r#"
    [[changeset]]
    id = "family"
    mosque_id = 1
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I1@"
    given_name = "Yusuf"
    [[changeset.rows]]
    kind = "gedcom_family"
    id = "@F1@"
    [[changeset.rows]]
    kind = "gedcom_family_child"
    family_id = "@F1@"
    child_id = "@I1@"
    relationship_type = "STEP"
  "#;
  let err = migrate(&s, source, TenantScope::All).await.unwrap_err();
  let Error::Row { changeset, index, kind, source } = err else {
    panic!("expected a row error");
  };
  assert_eq!((changeset.as_str(), index, kind), ("family", 2, "gedcom_family_child"));
  assert!(matches!(*source, Error::Coerce { field: "relationship_type", .. }));

  // Planning failed, so nothing from the changeset was written.
  assert!(s.get_individual(M1, "@I1@").await.unwrap().is_none());
  assert_eq!(s.list_changesets().await.unwrap().len(), 1);
}

const NOTED: &str = r#"
  [[changeset]]
  id = "notes"
  mosque_id = 1
  [[changeset.rows]]
  kind = "gedcom_individual"
  id = "@I1@"
  given_name = "Yusuf"
  [[changeset.rows]]
  kind = "gedcom_note"
  id = 1
  text = "Led the Eid prayer in 1984"
  created_at = "CREATED_AT"
  [[changeset.rows]]
  kind = "gedcom_note_link"
  note_id = 1
  entity_type = "INDI"
  entity_id = "@I1@"
"#;

#[tokio::test]
async fn note_with_bare_date_created_at_is_rejected() {
  let s = with_mosques().await;
  let source = NOTED.replace("CREATED_AT", "2024-01-01");
  let err = migrate(&s, &source, TenantScope::All).await.unwrap_err();
  let Error::Row { index, source, .. } = err else {
    panic!("expected a row error");
  };
  assert_eq!(index, 1);
  assert!(matches!(*source, Error::Coerce { field: "created_at", .. }));
  assert!(s.notes_for(M1, EntityType::Individual, "@I1@").await.unwrap().is_empty());
}

#[tokio::test]
async fn note_created_at_reads_back() {
  let s = with_mosques().await;
  let source = NOTED.replace("CREATED_AT", "2024-01-01T09:30:00+01:00");
  migrate(&s, &source, TenantScope::All).await.unwrap();
  let notes = s.notes_for(M1, EntityType::Individual, "@I1@").await.unwrap();
  assert_eq!(
    notes[0].created_at.map(|t| t.to_rfc3339()).as_deref(),
    Some("2024-01-01T08:30:00+00:00")
  );

  // Blank is stamped with the run time.
  let s = with_mosques().await;
  let before = chrono::Utc::now();
  migrate(&s, &NOTED.replace("CREATED_AT", ""), TenantScope::All).await.unwrap();
  let notes = s.notes_for(M1, EntityType::Individual, "@I1@").await.unwrap();
  assert!(notes[0].created_at.is_some_and(|t| t >= before));
}

// ─── Finance ─────────────────────────────────────────────────────────────────

const DUES: &str = r#"
  [[changeset]]
  id = "dues"
  mosque_id = 1
  [[changeset.rows]]
  kind = "person"
  id = 7
  first_name = "Yusuf"
  [[changeset.rows]]
  kind = "contribution_type"
  id = 1
  code = "DUES"
  is_required = true
  [[changeset.rows]]
  kind = "contribution_type_translation"
  contribution_type_id = 1
  locale = "nl"
  name = "Contributie"
  [[changeset.rows]]
  kind = "contribution_obligation"
  id = 1
  contribution_type_id = 1
  amount = "35.00"
  frequency = "monthly"
  start_date = "2024-01-01"
  [[changeset.rows]]
  kind = "member_contribution_exemption"
  id = 1
  person_id = 7
  contribution_type_id = 1
  exemption_type = "DISCOUNT_AMOUNT"
  amount = 5
  start_date = "2024-01-01"
  [[changeset.rows]]
  kind = "member_payment"
  id = 1
  person_id = 7
  contribution_type_id = 1
  amount = "AMOUNT"
  payment_date = "2024-02-01"
"#;

#[tokio::test]
async fn seeded_dues_read_back_scoped() {
  let s = with_mosques().await;
  migrate(&s, &DUES.replace("AMOUNT", "30.00"), TenantScope::All).await.unwrap();

  let types = s.list_contribution_types(M1).await.unwrap();
  assert_eq!(types.len(), 1);
  assert!(types[0].is_required && types[0].is_active);
  assert!(s.list_contribution_types(M2).await.unwrap().is_empty());
  assert_eq!(s.contribution_type_translations(M1, 1).await.unwrap()[0].name, "Contributie");

  let obligation = &s.contribution_obligations(M1, 1).await.unwrap()[0];
  let exemption = &s.person_exemptions(M1, 7).await.unwrap()[0];
  let payments = s.person_payments(M1, 7).await.unwrap();
  assert_eq!(exemption.apply(obligation.amount), payments[0].amount);
  assert!(s.person_payments(M2, 7).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_positive_payment_is_rejected() {
  let s = with_mosques().await;
  let err = migrate(&s, &DUES.replace("AMOUNT", "-30"), TenantScope::All)
    .await
    .unwrap_err();
  let Error::Row { index, source, .. } = err else {
    panic!("expected a row error");
  };
  assert_eq!(index, 5);
  assert!(matches!(*source, Error::Coerce { field: "amount", .. }));
  assert!(s.list_contribution_types(M1).await.unwrap().is_empty());
}

// ─── Failure and rollback ────────────────────────────────────────────────────

#[tokio::test]
async fn failing_row_rolls_back_its_changeset_and_halts() {
  let s = with_mosques().await;
  let source = r#"
    [[changeset]]
    id = "ok"
    mosque_id = 1
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I1@"
    given_name = "Yusuf"

    [[changeset]]
    id = "broken"
    mosque_id = 1
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I2@"
    given_name = "Amina"
    [[changeset.rows]]
    kind = "gedcom_family_child"
    family_id = "@F404@"
    child_id = "@I2@"

    [[changeset]]
    id = "never"
    mosque_id = 1
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I3@"
    given_name = "Ibrahim"
  "#;
  let err = migrate(&s, source, TenantScope::All).await.unwrap_err();
  assert!(matches!(
    &err,
    Error::Row { changeset, index: 1, source, .. }
      if changeset == "broken" && matches!(**source, Error::Sqlite(_))
  ));

  assert!(s.get_individual(M1, "@I1@").await.unwrap().is_some());
  assert!(s.get_individual(M1, "@I2@").await.unwrap().is_none());
  assert!(s.get_individual(M1, "@I3@").await.unwrap().is_none());
  let applied: Vec<_> =
    s.list_changesets().await.unwrap().into_iter().map(|c| c.id).collect();
  assert_eq!(applied, ["000-mosques", "ok"]);
}

// ─── Tenant stamping ─────────────────────────────────────────────────────────

#[tokio::test]
async fn rows_are_stamped_with_changeset_or_run_tenant() {
  let s = with_mosques().await;
  let source = r#"
    [[changeset]]
    id = "for-two"
    mosque_id = 2
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I1@"
    given_name = "Tariq"
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I2@"
    given_name = "Explicit"
    mosque_id = 1

    [[changeset]]
    id = "for-run"
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I3@"
    given_name = "Ibrahim"
  "#;
  migrate(&s, source, M1).await.unwrap();

  let in_m1: Vec<_> =
    s.list_individuals(M1).await.unwrap().into_iter().map(|i| i.id).collect();
  let in_m2: Vec<_> =
    s.list_individuals(M2).await.unwrap().into_iter().map(|i| i.id).collect();
  assert_eq!(in_m1, ["@I2@", "@I3@"]);
  assert_eq!(in_m2, ["@I1@"]);
}

#[tokio::test]
async fn super_admin_run_leaves_unscoped_rows_unstamped() {
  let s = with_mosques().await;
  let source = r#"
    [[changeset]]
    id = "shared"
    [[changeset.rows]]
    kind = "gedcom_individual"
    id = "@I1@"
    given_name = "Nobody"
  "#;
  migrate(&s, source, TenantScope::All).await.unwrap();
  let all = s.list_individuals(TenantScope::All).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].mosque_id, None);
  assert!(s.list_individuals(M1).await.unwrap().is_empty());
}

#[tokio::test]
async fn checksum_covers_stamped_tenant() {
  let changelog = Changelog::parse(
    r#"
      [[changeset]]
      id = "x"
      [[changeset.rows]]
      kind = "gedcom_source"
      id = "@S1@"
      title = "Register"
    "#,
  )
  .unwrap();
  let cs = &changelog.changesets[0];
  let one = runner::checksum(&runner::plan(cs, M1).unwrap());
  let two = runner::checksum(&runner::plan(cs, M2).unwrap());
  let again = runner::checksum(&runner::plan(cs, M1).unwrap());
  assert_ne!(one, two);
  assert_eq!(one, again);
}
