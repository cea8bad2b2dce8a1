//! Homepage version domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a homepage version.
///
/// The only transition is Draft → Published. Published versions stay
/// published even after the site pointer moves on to a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Editable working copy.
    Draft,
    /// Frozen snapshot that the site may point at.
    Published,
}

impl VersionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Returns true if the version payload may still be modified.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated publish, ready to be applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAction {
    /// Version being published.
    pub version_id: i64,
    /// Status before the publish.
    pub previous_status: VersionStatus,
    /// User performing the publish.
    pub published_by: i64,
}

impl PublishAction {
    /// Returns true when the version was already published and the publish
    /// only moves the site pointer back to it.
    #[must_use]
    pub fn is_republish(&self) -> bool {
        self.previous_status == VersionStatus::Published
    }
}
