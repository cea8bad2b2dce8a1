//! Homepage version lifecycle rules.

use serde_json::Value;

use crate::auth::UserRole;
use crate::homepage::error::HomepageError;
use crate::homepage::types::{PublishAction, VersionStatus};

/// Stateless service validating homepage version transitions.
pub struct HomepageService;

impl HomepageService {
    /// Returns the payload a new draft starts from: a copy of the currently
    /// published payload, or an empty object when nothing is published.
    #[must_use]
    pub fn draft_seed(current: Option<Value>) -> Value {
        match current {
            Some(payload) if !payload.is_null() => payload,
            _ => Value::Object(serde_json::Map::new()),
        }
    }

    /// Returns the payload of a draft update, rejecting an absent or `null` one.
    ///
    /// # Errors
    ///
    /// * `MissingPayload` if `payload` is absent or JSON `null`
    pub fn require_payload(payload: Option<&Value>) -> Result<&Value, HomepageError> {
        payload
            .filter(|p| !p.is_null())
            .ok_or(HomepageError::MissingPayload)
    }

    /// Checks that a version may still be edited.
    ///
    /// # Errors
    ///
    /// * `AlreadyPublished` if the version is published
    pub fn ensure_editable(version_id: i64, status: VersionStatus) -> Result<(), HomepageError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(HomepageError::AlreadyPublished(version_id))
        }
    }

    /// Validates a publish request.
    ///
    /// Publishing requires the MASTER role. Publishing an already-published
    /// version is allowed and re-points the site at it.
    ///
    /// # Errors
    ///
    /// * `PublishForbidden` if the actor's role is not MASTER (or unknown)
    pub fn publish(
        version_id: i64,
        current_status: VersionStatus,
        actor_id: i64,
        actor_role: &str,
    ) -> Result<PublishAction, HomepageError> {
        Self::authorize_publish(actor_role)?;

        Ok(PublishAction {
            version_id,
            previous_status: current_status,
            published_by: actor_id,
        })
    }

    /// Checks the role half of a publish without looking at any version.
    ///
    /// # Errors
    ///
    /// * `PublishForbidden` if the role is not MASTER (or unknown)
    pub fn authorize_publish(actor_role: &str) -> Result<(), HomepageError> {
        match UserRole::parse(actor_role) {
            Some(role) if role.can_publish() => Ok(()),
            _ => Err(HomepageError::PublishForbidden),
        }
    }
}
