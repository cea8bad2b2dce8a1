//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - The SQLite schema migration

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AuditRecord, AuditRepository, EXPORT_BATCH_SIZE, HomepageRepository, LeadDetail, LeadRecord,
    LeadRepository, LeadSummary, NewAuditEntry, NoteRecord, UserRepository, VersionSummary,
    payload_of,
};

use std::time::Duration;

use sea_orm::sqlx::sqlite::SqliteJournalMode;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// How long a connection waits for another writer before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(|opts| {
            opts.journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(BUSY_TIMEOUT)
        });
    Database::connect(options).await
}

/// Opens a fresh in-memory database with the schema applied.
///
/// Limited to a single pooled connection: every connection to `:memory:`
/// would otherwise see its own empty database.
///
/// # Errors
///
/// Returns an error if connecting or migrating fails.
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(3600))
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
