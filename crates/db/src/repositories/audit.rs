//! Audit log repository.
//!
//! Entries are append-only. [`AuditRepository::append`] runs on any connection,
//! including an open transaction, so an entry can commit atomically with the
//! change it describes. [`AuditRepository::record`] is the best-effort variant
//! used after a change has already been committed.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use larder_core::audit::{AuditAction, AuditEntity};

use crate::entities::{audit_logs, users};

/// Entry to be appended.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    /// Acting user, if any.
    pub user_id: Option<i64>,
    pub action: AuditAction,
    pub entity: Option<AuditEntity>,
    pub entity_id: Option<i64>,
    pub meta: Option<Value>,
}

impl NewAuditEntry {
    /// Entry about one entity, without metadata.
    #[must_use]
    pub const fn new(user_id: i64, action: AuditAction, entity: AuditEntity, entity_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            action,
            entity: Some(entity),
            entity_id: Some(entity_id),
            meta: None,
        }
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Audit entry as listed, with the actor's email.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub action: String,
    pub entity: Option<String>,
    pub entity_id: Option<i64>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an entry on the given connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append<C>(conn: &C, entry: &NewAuditEntry) -> Result<audit_logs::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let meta = entry.meta.as_ref().map(Value::to_string);
        audit_logs::ActiveModel {
            user_id: Set(entry.user_id),
            action: Set(entry.action.as_str().to_string()),
            entity: Set(entry.entity.map(|e| e.as_str().to_string())),
            entity_id: Set(entry.entity_id),
            meta: Set(meta),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await
    }

    /// Appends an entry, logging instead of failing when the write does not go through.
    pub async fn record(&self, entry: NewAuditEntry) {
        if let Err(e) = Self::append(&self.db, &entry).await {
            warn!(
                action = %entry.action,
                entity_id = ?entry.entity_id,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// Lists the newest entries first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, limit: u64) -> Result<Vec<AuditRecord>, DbErr> {
        let rows = audit_logs::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(entry, user)| AuditRecord {
                id: entry.id,
                user_id: entry.user_id,
                user_email: user.map(|u| u.email),
                action: entry.action,
                entity: entry.entity,
                entity_id: entry.entity_id,
                meta: entry.meta.and_then(|m| serde_json::from_str(&m).ok()),
                created_at: entry.created_at,
            })
            .collect())
    }
}
