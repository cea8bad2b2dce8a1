//! Lead error types.

use thiserror::Error;

/// Errors that can occur during lead operations.
#[derive(Debug, Error)]
pub enum LeadError {
    /// No lead with the given id.
    #[error("Lead {0} not found")]
    NotFound(i64),

    /// Update carried neither status nor tags.
    #[error("Nothing to update: provide status or tags")]
    EmptyUpdate,

    /// Unknown lead status.
    #[error("Invalid lead status: {0}")]
    InvalidStatus(String),

    /// Tags were not an array of strings.
    #[error("Tags must be an array of strings")]
    InvalidTags,

    /// Date filter could not be parsed.
    #[error("Invalid date: {0} (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDate(String),

    /// Note text was empty.
    #[error("Note text is required")]
    EmptyNote,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LeadError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::EmptyUpdate
            | Self::InvalidStatus(_)
            | Self::InvalidTags
            | Self::InvalidDate(_)
            | Self::EmptyNote => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "LEAD_NOT_FOUND",
            Self::EmptyUpdate => "EMPTY_UPDATE",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidTags => "INVALID_TAGS",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::EmptyNote => "EMPTY_NOTE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
