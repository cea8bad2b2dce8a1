//! Homepage versioning error types.

use thiserror::Error;

/// Errors that can occur during homepage versioning operations.
#[derive(Debug, Error)]
pub enum HomepageError {
    /// No version with the given id.
    #[error("Homepage version {0} not found")]
    VersionNotFound(i64),

    /// Attempted to edit a version that is already published.
    #[error("Homepage version {0} is published and can no longer be edited")]
    AlreadyPublished(i64),

    /// Actor's role does not allow publishing.
    #[error("Only the MASTER account can publish the homepage")]
    PublishForbidden,

    /// Draft update did not include a payload.
    #[error("Homepage data is required")]
    MissingPayload,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl HomepageError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingPayload => 400,
            Self::PublishForbidden => 403,
            Self::VersionNotFound(_) => 404,
            Self::AlreadyPublished(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::VersionNotFound(_) => "VERSION_NOT_FOUND",
            Self::AlreadyPublished(_) => "VERSION_PUBLISHED",
            Self::PublishForbidden => "PUBLISH_FORBIDDEN",
            Self::MissingPayload => "MISSING_PAYLOAD",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(HomepageError::MissingPayload.status_code(), 400);
        assert_eq!(HomepageError::PublishForbidden.status_code(), 403);
        assert_eq!(HomepageError::VersionNotFound(1).status_code(), 404);
        assert_eq!(HomepageError::AlreadyPublished(1).status_code(), 409);
        assert_eq!(HomepageError::Database(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HomepageError::AlreadyPublished(3).error_code(), "VERSION_PUBLISHED");
        assert!(HomepageError::AlreadyPublished(3).to_string().contains('3'));
        assert_eq!(HomepageError::PublishForbidden.error_code(), "PUBLISH_FORBIDDEN");
    }
}
