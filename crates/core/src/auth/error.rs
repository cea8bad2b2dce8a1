//! Authentication error types.

use thiserror::Error;

use super::password::PasswordError;

/// Message shared by every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email was blank.
    #[error("Email is required")]
    EmailRequired,

    /// Password rejected at registration.
    #[error(transparent)]
    WeakPassword(#[from] PasswordError),

    /// Unknown role requested at registration.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Email already registered.
    #[error("Email already registered")]
    EmailTaken,

    /// MASTER requested while other accounts exist.
    #[error("The MASTER account can only be created first")]
    MasterExists,

    /// Unknown email, wrong password, or unreadable stored hash.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account referenced by a token no longer exists.
    #[error("User {0} not found")]
    UserNotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::EmailRequired | Self::WeakPassword(_) | Self::InvalidRole(_) => 400,
            Self::InvalidCredentials => 401,
            Self::MasterExists => 403,
            Self::UserNotFound(_) => 404,
            Self::EmailTaken => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::MasterExists => "MASTER_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
