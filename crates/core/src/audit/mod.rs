//! Audit log vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    PublishHomepage,
    UpdateLead,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PublishHomepage => "publish_homepage",
            Self::UpdateLead => "update_lead",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of entity an audit entry may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    HomepageVersion,
    Lead,
}

impl AuditEntity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HomepageVersion => "homepage_version",
            Self::Lead => "lead",
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default number of entries returned by the audit listing.
pub const DEFAULT_LIST_LIMIT: u64 = 100;

/// Largest number of entries a client may request.
pub const MAX_LIST_LIMIT: u64 = 500;

/// Resolves the requested listing size.
#[must_use]
pub fn list_limit(requested: Option<u64>) -> u64 {
    requested.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}
