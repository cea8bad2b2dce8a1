//! Initial database migration.
//!
//! Creates the SQLite schema: accounts, homepage versions with the singleton
//! site pointer, leads with their notes, and the audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ACCOUNTS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(USERS_SINGLE_MASTER_SQL).await?;

        // ============================================================
        // PART 2: HOMEPAGE VERSIONING
        // ============================================================
        db.execute_unprepared(HOMEPAGE_VERSIONS_SQL).await?;
        db.execute_unprepared(SITE_STATE_SQL).await?;
        db.execute_unprepared(SITE_STATE_SEED_SQL).await?;

        // ============================================================
        // PART 3: LEADS
        // ============================================================
        db.execute_unprepared(LEADS_SQL).await?;
        db.execute_unprepared(LEADS_CREATED_AT_INDEX_SQL).await?;
        db.execute_unprepared(LEADS_STATUS_INDEX_SQL).await?;
        db.execute_unprepared(LEAD_NOTES_SQL).await?;
        db.execute_unprepared(LEAD_NOTES_LEAD_INDEX_SQL).await?;

        // ============================================================
        // PART 4: AUDIT
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;
        db.execute_unprepared(AUDIT_LOGS_CREATED_AT_INDEX_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in [
            "audit_logs",
            "lead_notes",
            "leads",
            "site_state",
            "homepage_versions",
            "users",
        ] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table}"))
                .await?;
        }
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'STAFF' CHECK (role IN ('MASTER', 'STAFF')),
    created_at    TEXT NOT NULL
)";

// At most one MASTER, enforced by the store.
const USERS_SINGLE_MASTER_SQL: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_single_master ON users (role) WHERE role = 'MASTER'";

const HOMEPAGE_VERSIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS homepage_versions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    version    INTEGER NOT NULL,
    status     TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'published')),
    data       TEXT NOT NULL,
    created_by INTEGER REFERENCES users (id),
    created_at TEXT NOT NULL
)";

const SITE_STATE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS site_state (
    id                  INTEGER PRIMARY KEY CHECK (id = 1),
    homepage_version_id INTEGER REFERENCES homepage_versions (id)
)";

const SITE_STATE_SEED_SQL: &str = r"
INSERT OR IGNORE INTO site_state (id, homepage_version_id) VALUES (1, NULL)";

const LEADS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS leads (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name  TEXT,
    email      TEXT,
    phone      TEXT,
    source     TEXT NOT NULL DEFAULT 'contact_form',
    utm        TEXT NOT NULL DEFAULT '{}',
    message    TEXT,
    status     TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'contacted', 'won', 'lost')),
    tags       TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const LEADS_CREATED_AT_INDEX_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads (created_at)";

const LEADS_STATUS_INDEX_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_leads_status ON leads (status)";

const LEAD_NOTES_SQL: &str = r"
CREATE TABLE IF NOT EXISTS lead_notes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    lead_id    INTEGER NOT NULL REFERENCES leads (id) ON DELETE CASCADE,
    user_id    INTEGER REFERENCES users (id),
    note       TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const LEAD_NOTES_LEAD_INDEX_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_lead_notes_lead_id ON lead_notes (lead_id)";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS audit_logs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER REFERENCES users (id),
    action     TEXT NOT NULL,
    entity     TEXT,
    entity_id  INTEGER,
    meta       TEXT,
    created_at TEXT NOT NULL
)";

const AUDIT_LOGS_CREATED_AT_INDEX_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_audit_logs_created_at ON audit_logs (created_at)";
