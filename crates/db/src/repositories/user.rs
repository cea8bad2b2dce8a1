//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use tracing::info;

use larder_core::auth::{AuthError, UserRole};

use crate::entities::users;
use crate::repositories::begin_write;

/// User repository for account lookups and registration.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by (already normalized) email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Number of registered accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, DbErr> {
        users::Entity::find().count(&self.db).await
    }

    /// Registers an account.
    ///
    /// The MASTER role is only granted while no account exists. The check and
    /// the insert share one transaction, and the store's single-MASTER index
    /// rejects whatever slips past a concurrent registration.
    ///
    /// # Errors
    ///
    /// * `MasterExists` if MASTER is requested and an account already exists
    /// * `EmailTaken` if the email is registered
    /// * `Database` if the database operation fails
    pub async fn register(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<users::Model, AuthError> {
        let txn = begin_write(&self.db).await.map_err(db_error)?;

        if role == UserRole::Master {
            let existing = users::Entity::find().count(&txn).await.map_err(db_error)?;
            if existing > 0 {
                return Err(AuthError::MasterExists);
            }
        }

        let user = users::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.into()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(registration_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(user_id = %user.id, role = %role, "User registered");
        Ok(user)
    }
}

fn db_error(e: DbErr) -> AuthError {
    AuthError::Database(e.to_string())
}

fn registration_error(e: DbErr) -> AuthError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("users.role") => {
            AuthError::MasterExists
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::EmailTaken,
        _ => db_error(e),
    }
}
