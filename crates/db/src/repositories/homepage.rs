//! Homepage version repository.
//!
//! Lifecycle rules come from [`HomepageService`]; this repository applies
//! them to the store. Publishing writes the version status, the site pointer,
//! and the audit entry in one transaction.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use larder_core::audit::{AuditAction, AuditEntity};
use larder_core::homepage::{HomepageError, HomepageService};

use crate::entities::{
    homepage_versions, sea_orm_active_enums::VersionStatus, site_state,
    site_state::SINGLETON_ID,
};
use crate::repositories::audit::{AuditRepository, NewAuditEntry};
use crate::repositories::begin_write;

/// Version listing entry, without its payload.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub id: i64,
    pub version: i64,
    pub status: VersionStatus,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Whether the site currently renders this version.
    pub is_current: bool,
}

/// Homepage version repository.
#[derive(Debug, Clone)]
pub struct HomepageRepository {
    db: DatabaseConnection,
}

impl HomepageRepository {
    /// Creates a new homepage repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the version the site points at, if any.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn current(&self) -> Result<Option<homepage_versions::Model>, HomepageError> {
        current_version(&self.db).await.map_err(db_error)
    }

    /// Returns the payload of the published version, if any.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails or the stored payload is not JSON.
    pub async fn current_payload(&self) -> Result<Option<Value>, HomepageError> {
        self.current().await?.as_ref().map(payload_of).transpose()
    }

    /// Finds a version by id.
    ///
    /// # Errors
    ///
    /// * `VersionNotFound` if no such version exists
    /// * `Database` if the query fails
    pub async fn find(&self, id: i64) -> Result<homepage_versions::Model, HomepageError> {
        homepage_versions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(HomepageError::VersionNotFound(id))
    }

    /// Creates a draft seeded with the published payload (or `{}`).
    ///
    /// # Errors
    ///
    /// Returns `Database` if the database operation fails.
    pub async fn create_draft(
        &self,
        actor_id: i64,
    ) -> Result<homepage_versions::Model, HomepageError> {
        let txn = begin_write(&self.db).await.map_err(db_error)?;

        let current = current_version(&txn)
            .await
            .map_err(db_error)?
            .as_ref()
            .map(payload_of)
            .transpose()?;
        let seed = HomepageService::draft_seed(current);

        let latest = homepage_versions::Entity::find()
            .order_by_desc(homepage_versions::Column::Version)
            .one(&txn)
            .await
            .map_err(db_error)?
            .map_or(0, |v| v.version);

        let draft = homepage_versions::ActiveModel {
            version: Set(latest + 1),
            status: Set(VersionStatus::Draft),
            data: Set(seed.to_string()),
            created_by: Set(Some(actor_id)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(version_id = %draft.id, version = draft.version, user_id = %actor_id, "Homepage draft created");
        Ok(draft)
    }

    /// Replaces the payload of a draft.
    ///
    /// # Errors
    ///
    /// * `VersionNotFound` if no such version exists
    /// * `AlreadyPublished` if the version is no longer a draft
    /// * `Database` if the database operation fails
    pub async fn update_draft(
        &self,
        id: i64,
        payload: &Value,
    ) -> Result<homepage_versions::Model, HomepageError> {
        let version = self.find(id).await?;
        HomepageService::ensure_editable(id, version.status.into())?;

        // Conditional on draft status so a publish landing in between wins.
        let result = homepage_versions::Entity::update_many()
            .col_expr(homepage_versions::Column::Data, Expr::value(payload.to_string()))
            .filter(homepage_versions::Column::Id.eq(id))
            .filter(homepage_versions::Column::Status.eq(VersionStatus::Draft))
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(HomepageError::AlreadyPublished(id));
        }

        self.find(id).await
    }

    /// Publishes a version and points the site at it.
    ///
    /// Publishing an already-published version moves the pointer back to it.
    ///
    /// # Errors
    ///
    /// * `PublishForbidden` if the role is not MASTER; nothing is read or written
    /// * `VersionNotFound` if no such version exists
    /// * `Database` if the database operation fails; nothing is written
    pub async fn publish(
        &self,
        id: i64,
        actor_id: i64,
        actor_role: &str,
    ) -> Result<homepage_versions::Model, HomepageError> {
        HomepageService::authorize_publish(actor_role)?;

        let txn = begin_write(&self.db).await.map_err(db_error)?;

        let version = homepage_versions::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(HomepageError::VersionNotFound(id))?;

        let action = HomepageService::publish(id, version.status.into(), actor_id, actor_role)?;
        let version_number = version.version;

        let mut active: homepage_versions::ActiveModel = version.into();
        active.status = Set(VersionStatus::Published);
        let published = active.update(&txn).await.map_err(db_error)?;

        let pointer = site_state::Entity::update_many()
            .col_expr(site_state::Column::HomepageVersionId, Expr::value(id))
            .filter(site_state::Column::Id.eq(SINGLETON_ID))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        if pointer.rows_affected == 0 {
            site_state::ActiveModel {
                id: Set(SINGLETON_ID),
                homepage_version_id: Set(Some(id)),
            }
            .insert(&txn)
            .await
            .map_err(db_error)?;
        }

        let entry = NewAuditEntry::new(
            actor_id,
            AuditAction::PublishHomepage,
            AuditEntity::HomepageVersion,
            id,
        )
        .with_meta(json!({ "version": version_number }));
        AuditRepository::append(&txn, &entry).await.map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(
            version_id = %id,
            version = version_number,
            user_id = %actor_id,
            republish = action.is_republish(),
            "Homepage published"
        );
        Ok(published)
    }

    /// Lists all versions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list_versions(&self) -> Result<Vec<VersionSummary>, HomepageError> {
        let current_id = pointer(&self.db).await.map_err(db_error)?;
        let versions = homepage_versions::Entity::find()
            .order_by_desc(homepage_versions::Column::Version)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(versions
            .into_iter()
            .map(|v| VersionSummary {
                is_current: current_id == Some(v.id),
                id: v.id,
                version: v.version,
                status: v.status,
                created_by: v.created_by,
                created_at: v.created_at,
            })
            .collect())
    }
}

/// Parses the stored payload of a version.
///
/// # Errors
///
/// Returns `Database` if the stored text is not JSON.
pub fn payload_of(version: &homepage_versions::Model) -> Result<Value, HomepageError> {
    serde_json::from_str(&version.data).map_err(|e| {
        HomepageError::Database(format!("version {} payload is not JSON: {e}", version.id))
    })
}

async fn pointer<C: ConnectionTrait>(conn: &C) -> Result<Option<i64>, DbErr> {
    Ok(site_state::Entity::find_by_id(SINGLETON_ID)
        .one(conn)
        .await?
        .and_then(|s| s.homepage_version_id))
}

async fn current_version<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<homepage_versions::Model>, DbErr> {
    match pointer(conn).await? {
        Some(id) => homepage_versions::Entity::find_by_id(id).one(conn).await,
        None => Ok(None),
    }
}

fn db_error(e: DbErr) -> HomepageError {
    HomepageError::Database(e.to_string())
}
