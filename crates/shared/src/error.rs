//! Application-wide error types.
//!
//! Domain failures carry their own status and code in the enum of the module
//! that raises them. `AppError` covers the failures no domain owns.

use thiserror::Error;

/// Store and runtime failures outside any domain.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message without the category prefix added by `Display`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Database(m) | Self::Internal(m) => m,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
