//! SQL schema for the mosque registry.
//!
//! Executed at connection startup. Enumerated columns carry a `CHECK`
//! listing exactly the declared values of their enum; the tests below keep
//! the two in step.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ─── Tenants and reference data ──────────────────────────────────────────

CREATE TABLE IF NOT EXISTS mosques (
    id          INTEGER PRIMARY KEY,
    name        TEXT    NOT NULL,
    short_name  TEXT,
    address     TEXT,
    city        TEXT,
    country     TEXT,
    postal_code TEXT,
    phone       TEXT,
    email       TEXT,
    website     TEXT,
    active      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS currencies (
    id             INTEGER PRIMARY KEY,
    code           TEXT    NOT NULL UNIQUE CHECK (length(code) = 3),
    name           TEXT    NOT NULL,
    symbol         TEXT,
    decimal_places INTEGER NOT NULL DEFAULT 2
);

CREATE TABLE IF NOT EXISTS mosque_currencies (
    id          INTEGER PRIMARY KEY,
    mosque_id   INTEGER REFERENCES mosques(id),
    currency_id INTEGER NOT NULL REFERENCES currencies(id),
    is_primary  INTEGER NOT NULL DEFAULT 0,
    is_active   INTEGER NOT NULL DEFAULT 1,
    UNIQUE (mosque_id, currency_id)
);

-- ─── Access control (shared by all tenants) ──────────────────────────────

CREATE TABLE IF NOT EXISTS roles (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS permissions (
    id          INTEGER PRIMARY KEY,
    code        TEXT NOT NULL UNIQUE,
    description TEXT,
    category    TEXT
);

CREATE TABLE IF NOT EXISTS role_assignable_permissions (
    role_id       INTEGER NOT NULL REFERENCES roles(id),
    permission_id INTEGER NOT NULL REFERENCES permissions(id),
    PRIMARY KEY (role_id, permission_id)
);

CREATE TABLE IF NOT EXISTS users (
    id                  INTEGER PRIMARY KEY,
    username            TEXT NOT NULL UNIQUE,
    password            TEXT NOT NULL,   -- PHC hash string
    email               TEXT,
    account_enabled     INTEGER,
    account_locked      INTEGER,
    credentials_expired INTEGER
);

CREATE TABLE IF NOT EXISTS user_roles (
    user_id INTEGER NOT NULL REFERENCES users(id),
    role_id INTEGER NOT NULL REFERENCES roles(id),
    PRIMARY KEY (user_id, role_id)
);

-- ─── Genealogy ───────────────────────────────────────────────────────────

-- No parent or spouse columns: relationships live in families and
-- family children only.
CREATE TABLE IF NOT EXISTS gedcom_individuals (
    id          TEXT PRIMARY KEY CHECK (length(id) <= 20),
    given_name  TEXT NOT NULL,
    surname     TEXT,
    sex         TEXT CHECK (sex IN ('M', 'F', 'U')),
    birth_date  TEXT,
    birth_place TEXT,
    death_date  TEXT,
    death_place TEXT,
    living      INTEGER NOT NULL DEFAULT 1,
    mosque_id   INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS gedcom_families (
    id             TEXT PRIMARY KEY CHECK (length(id) <= 20),
    husband_id     TEXT REFERENCES gedcom_individuals(id),
    wife_id        TEXT REFERENCES gedcom_individuals(id),
    marriage_date  TEXT,
    marriage_place TEXT,
    divorce_date   TEXT,
    divorce_place  TEXT,
    mosque_id      INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS gedcom_family_children (
    id                INTEGER PRIMARY KEY,
    family_id         TEXT NOT NULL REFERENCES gedcom_families(id),
    child_id          TEXT NOT NULL REFERENCES gedcom_individuals(id),
    relationship_type TEXT NOT NULL DEFAULT 'BIOLOGICAL'
                      CHECK (relationship_type IN ('BIOLOGICAL', 'ADOPTED', 'FOSTER')),
    birth_order       INTEGER,
    mosque_id         INTEGER REFERENCES mosques(id),
    UNIQUE (family_id, child_id)
);

CREATE TABLE IF NOT EXISTS gedcom_events (
    id          INTEGER PRIMARY KEY,
    type        TEXT NOT NULL
                CHECK (type IN ('BIRT', 'DEAT', 'CHR', 'BURI', 'CENS', 'MARR', 'DIV', 'ANUL', 'ENGA', 'RESI', 'EMIG', 'IMMI', 'NATU', 'GRAD', 'RETI', 'EVEN')),
    date        TEXT,
    place       TEXT,
    description TEXT,
    family_id   TEXT REFERENCES gedcom_families(id),
    mosque_id   INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS gedcom_event_participants (
    id            INTEGER PRIMARY KEY,
    event_id      INTEGER NOT NULL REFERENCES gedcom_events(id),
    individual_id TEXT    NOT NULL REFERENCES gedcom_individuals(id),
    role          TEXT    NOT NULL
                  CHECK (role IN ('PRINCIPAL', 'WITNESS', 'OFFICIANT', 'CHILD')),
    UNIQUE (event_id, individual_id, role)
);

CREATE TABLE IF NOT EXISTS gedcom_sources (
    id          TEXT PRIMARY KEY CHECK (length(id) <= 20),
    title       TEXT NOT NULL,
    author      TEXT,
    publication TEXT,
    repository  TEXT,
    call_number TEXT,
    notes       TEXT,
    mosque_id   INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS gedcom_citations (
    id         INTEGER PRIMARY KEY,
    source_id  TEXT    NOT NULL REFERENCES gedcom_sources(id),
    event_id   INTEGER NOT NULL REFERENCES gedcom_events(id),
    page       TEXT,
    text       TEXT,
    confidence TEXT CHECK (confidence IN ('HIGH', 'MEDIUM', 'LOW'))
);

CREATE TABLE IF NOT EXISTS gedcom_notes (
    id         INTEGER PRIMARY KEY,
    text       TEXT NOT NULL,
    created_at TEXT,
    created_by TEXT,
    mosque_id  INTEGER REFERENCES mosques(id)
);

-- entity_id is a polymorphic reference; entity_type says where it points.
CREATE TABLE IF NOT EXISTS gedcom_note_links (
    id          INTEGER PRIMARY KEY,
    note_id     INTEGER NOT NULL REFERENCES gedcom_notes(id),
    entity_type TEXT    NOT NULL
                CHECK (entity_type IN ('INDI', 'FAM', 'EVENT', 'SOUR', 'OBJE')),
    entity_id   TEXT    NOT NULL,
    UNIQUE (note_id, entity_type, entity_id)
);

CREATE TABLE IF NOT EXISTS gedcom_media (
    id          TEXT PRIMARY KEY CHECK (length(id) <= 20),
    file_path   TEXT NOT NULL,
    title       TEXT,
    media_type  TEXT NOT NULL
                CHECK (media_type IN ('PHOTO', 'DOCUMENT', 'AUDIO', 'VIDEO')),
    mime_type   TEXT,
    description TEXT,
    file_size   INTEGER,
    mosque_id   INTEGER REFERENCES mosques(id)
);

-- ─── Member registry ─────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS persons (
    id            INTEGER PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT,
    gender        TEXT,
    date_of_birth TEXT,
    date_of_death TEXT,
    email         TEXT UNIQUE,
    phone         TEXT,
    address       TEXT,
    city          TEXT,
    country       TEXT,
    postal_code   TEXT,
    status        TEXT NOT NULL DEFAULT 'ACTIVE'
                  CHECK (status IN ('ACTIVE', 'INACTIVE', 'DECEASED')),
    hash          TEXT UNIQUE,     -- identity fingerprint
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    mosque_id     INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS members (
    id                INTEGER PRIMARY KEY,
    individual_id     TEXT REFERENCES gedcom_individuals(id),
    email             TEXT,
    phone             TEXT,
    address           TEXT,
    city              TEXT,
    country           TEXT,
    postal_code       TEXT,
    membership_status TEXT NOT NULL DEFAULT 'ACTIVE'
                      CHECK (membership_status IN ('ACTIVE', 'EXPIRED', 'SUSPENDED', 'CANCELLED')),
    member_since      TEXT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    mosque_id         INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS memberships (
    id              INTEGER PRIMARY KEY,
    person_id       INTEGER NOT NULL REFERENCES persons(id),
    membership_type TEXT NOT NULL
                    CHECK (membership_type IN ('FULL', 'ASSOCIATE', 'YOUTH', 'SENIOR', 'FAMILY')),
    start_date      TEXT NOT NULL,
    end_date        TEXT,
    status          TEXT NOT NULL DEFAULT 'ACTIVE'
                    CHECK (status IN ('ACTIVE', 'EXPIRED', 'SUSPENDED', 'CANCELLED')),
    notes           TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    mosque_id       INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS gedcom_person_links (
    id                   INTEGER PRIMARY KEY,
    person_id            INTEGER NOT NULL UNIQUE REFERENCES persons(id),
    gedcom_individual_id TEXT    NOT NULL UNIQUE REFERENCES gedcom_individuals(id),
    linked_by            TEXT,
    link_reason          TEXT,
    linked_at            TEXT NOT NULL,
    updated_at           TEXT NOT NULL,
    mosque_id            INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS user_member_link (
    id        INTEGER PRIMARY KEY,
    user_id   INTEGER NOT NULL UNIQUE REFERENCES users(id),
    person_id INTEGER NOT NULL UNIQUE REFERENCES persons(id),
    linked_at TEXT    NOT NULL,
    mosque_id INTEGER REFERENCES mosques(id)
);

-- ─── Finance ─────────────────────────────────────────────────────────────

-- Amounts are decimal text; the CHECKs compare their numeric value.
CREATE TABLE IF NOT EXISTS contribution_types (
    id          INTEGER PRIMARY KEY,
    code        TEXT    NOT NULL CHECK (length(code) <= 50),
    is_required INTEGER NOT NULL DEFAULT 0,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT    NOT NULL,
    mosque_id   INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS contribution_type_translations (
    id                   INTEGER PRIMARY KEY,
    contribution_type_id INTEGER NOT NULL REFERENCES contribution_types(id),
    locale               TEXT    NOT NULL CHECK (length(locale) <= 10),
    name                 TEXT    NOT NULL,
    description          TEXT,
    UNIQUE (contribution_type_id, locale)
);

CREATE TABLE IF NOT EXISTS contribution_obligations (
    id                   INTEGER PRIMARY KEY,
    contribution_type_id INTEGER NOT NULL REFERENCES contribution_types(id),
    amount               TEXT    NOT NULL CHECK (CAST(amount AS REAL) > 0),
    frequency            TEXT    NOT NULL
                         CHECK (frequency IN ('MONTHLY', 'YEARLY')),
    start_date           TEXT    NOT NULL,
    currency_id          INTEGER REFERENCES currencies(id),
    mosque_id            INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS member_contribution_exemptions (
    id                   INTEGER PRIMARY KEY,
    person_id            INTEGER NOT NULL REFERENCES persons(id),
    contribution_type_id INTEGER NOT NULL REFERENCES contribution_types(id),
    exemption_type       TEXT    NOT NULL
                         CHECK (exemption_type IN ('FULL', 'FIXED_AMOUNT', 'DISCOUNT_AMOUNT', 'DISCOUNT_PERCENTAGE')),
    amount               TEXT,
    reason               TEXT,
    start_date           TEXT    NOT NULL,
    end_date             TEXT,
    is_active            INTEGER NOT NULL DEFAULT 1,
    mosque_id            INTEGER REFERENCES mosques(id)
);

CREATE TABLE IF NOT EXISTS member_payments (
    id                   INTEGER PRIMARY KEY,
    person_id            INTEGER NOT NULL REFERENCES persons(id),
    contribution_type_id INTEGER NOT NULL REFERENCES contribution_types(id),
    amount               TEXT    NOT NULL CHECK (CAST(amount AS REAL) > 0),
    payment_date         TEXT    NOT NULL,
    reference            TEXT,
    notes                TEXT,
    created_by           INTEGER,
    currency_id          INTEGER REFERENCES currencies(id),
    created_at           TEXT    NOT NULL,
    mosque_id            INTEGER REFERENCES mosques(id)
);

-- Scoped through members.mosque_id.
CREATE TABLE IF NOT EXISTS membership_fees (
    id                    INTEGER PRIMARY KEY,
    member_id             INTEGER NOT NULL REFERENCES members(id),
    amount                TEXT    NOT NULL CHECK (CAST(amount AS REAL) > 0),
    due_date              TEXT    NOT NULL,
    paid_date             TEXT,
    status                TEXT    NOT NULL DEFAULT 'PENDING'
                          CHECK (status IN ('PENDING', 'PAID', 'OVERDUE', 'CANCELLED')),
    payment_method        TEXT
                          CHECK (payment_method IN ('CASH', 'BANK_TRANSFER', 'CREDIT_CARD', 'DEBIT_CARD', 'CHECK', 'OTHER')),
    transaction_reference TEXT,
    notes                 TEXT,
    created_at            TEXT
);

CREATE TABLE IF NOT EXISTS donations (
    id             INTEGER PRIMARY KEY,
    person_id      INTEGER NOT NULL REFERENCES persons(id),
    amount         TEXT    NOT NULL,
    donation_type  TEXT    NOT NULL
                   CHECK (donation_type IN ('ZAKAT', 'SADAQAH', 'BUILDING_FUND', 'EDUCATION_FUND', 'RAMADAN_PROGRAM', 'GENERAL', 'OTHER')),
    donation_date  TEXT    NOT NULL,
    receipt_number TEXT,
    notes          TEXT,
    anonymous      INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT    NOT NULL,
    mosque_id      INTEGER REFERENCES mosques(id)
);

-- Scoped through persons.mosque_id.
CREATE TABLE IF NOT EXISTS subscriptions (
    id        INTEGER PRIMARY KEY,
    person_id INTEGER NOT NULL REFERENCES persons(id),
    frequency TEXT    NOT NULL
              CHECK (frequency IN ('WEEKLY', 'MONTHLY', 'QUARTERLY', 'YEARLY')),
    status    TEXT    NOT NULL DEFAULT 'ACTIVE'
              CHECK (status IN ('ACTIVE', 'PAUSED', 'CANCELLED', 'EXPIRED'))
);

CREATE TABLE IF NOT EXISTS exchange_rates (
    id               INTEGER PRIMARY KEY,
    from_currency_id INTEGER NOT NULL REFERENCES currencies(id),
    to_currency_id   INTEGER NOT NULL REFERENCES currencies(id),
    rate             TEXT    NOT NULL CHECK (CAST(rate AS REAL) > 0),
    effective_date   TEXT    NOT NULL,
    created_at       TEXT,
    mosque_id        INTEGER REFERENCES mosques(id),
    CHECK (from_currency_id <> to_currency_id),
    UNIQUE (mosque_id, from_currency_id, to_currency_id, effective_date)
);

-- ─── Migration ledger ────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS applied_changesets (
    id         TEXT PRIMARY KEY,
    author     TEXT,
    checksum   TEXT    NOT NULL,   -- hex SHA-256 of the planned statements
    applied_at TEXT    NOT NULL,
    row_count  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS individuals_mosque_idx   ON gedcom_individuals(mosque_id);
CREATE INDEX IF NOT EXISTS families_mosque_idx      ON gedcom_families(mosque_id);
CREATE INDEX IF NOT EXISTS families_husband_idx     ON gedcom_families(husband_id);
CREATE INDEX IF NOT EXISTS families_wife_idx        ON gedcom_families(wife_id);
CREATE INDEX IF NOT EXISTS family_children_child_idx ON gedcom_family_children(child_id);
CREATE INDEX IF NOT EXISTS participants_individual_idx ON gedcom_event_participants(individual_id);
CREATE INDEX IF NOT EXISTS note_links_entity_idx    ON gedcom_note_links(entity_type, entity_id);
CREATE INDEX IF NOT EXISTS persons_mosque_idx       ON persons(mosque_id);
CREATE INDEX IF NOT EXISTS memberships_person_idx   ON memberships(person_id);
CREATE INDEX IF NOT EXISTS payments_person_idx      ON member_payments(person_id);
CREATE INDEX IF NOT EXISTS exemptions_person_idx    ON member_contribution_exemptions(person_id);
CREATE INDEX IF NOT EXISTS donations_person_idx     ON donations(person_id);
CREATE INDEX IF NOT EXISTS fees_member_idx          ON membership_fees(member_id);

PRAGMA user_version = 2;
";
