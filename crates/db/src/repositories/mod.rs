//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

pub mod audit;
pub mod homepage;
pub mod lead;
pub mod user;

pub use audit::{AuditRecord, AuditRepository, NewAuditEntry};
pub use homepage::{HomepageRepository, VersionSummary, payload_of};
pub use lead::{
    EXPORT_BATCH_SIZE, LeadDetail, LeadRecord, LeadRepository, LeadSummary, NoteRecord,
};
pub use user::UserRepository;

/// No-op write on the singleton row; any table works.
const TAKE_WRITE_LOCK: &str = "UPDATE site_state SET id = id WHERE id = 1";

/// Begins a transaction that holds the SQLite write lock from its first statement.
///
/// A deferred transaction that reads before it writes fails with
/// `SQLITE_BUSY` when another writer commits in between. Taking the lock up
/// front makes a contended transaction wait out the busy timeout instead.
pub(crate) async fn begin_write(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    let txn = db.begin().await?;
    txn.execute_unprepared(TAKE_WRITE_LOCK).await?;
    Ok(txn)
}
