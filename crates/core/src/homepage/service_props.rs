//! Property-based tests for HomepageService.

use proptest::prelude::*;
use serde_json::{Value, json};

use crate::homepage::error::HomepageError;
use crate::homepage::service::HomepageService;
use crate::homepage::types::VersionStatus;

fn arb_status() -> impl Strategy<Value = VersionStatus> {
    prop_oneof![Just(VersionStatus::Draft), Just(VersionStatus::Published)]
}

/// Role strings, including unknown ones and case variants.
fn arb_role() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("MASTER".to_string()),
        Just("master".to_string()),
        Just("STAFF".to_string()),
        "[A-Za-z]{0,8}",
    ]
}

fn arb_payload() -> impl Strategy<Value = Value> {
    ("[a-zA-Z ]{0,20}", 0usize..4).prop_map(|(title, n)| {
        json!({
            "hero": {"title": title},
            "products": (0..n).map(|i| json!({"id": i})).collect::<Vec<_>>(),
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Publish succeeds exactly when the role is MASTER, whatever the version status.
    #[test]
    fn prop_publish_authorized_only_for_master(
        version_id in 1i64..10_000,
        status in arb_status(),
        actor in 1i64..10_000,
        role in arb_role(),
    ) {
        let result = HomepageService::publish(version_id, status, actor, &role);
        let is_master = role.eq_ignore_ascii_case("MASTER");
        prop_assert_eq!(result.is_ok(), is_master);
        if !is_master {
            prop_assert!(matches!(result, Err(HomepageError::PublishForbidden)));
        }
    }

    /// A new draft always starts from exactly the published payload.
    #[test]
    fn prop_draft_seed_copies_published(payload in arb_payload()) {
        prop_assert_eq!(HomepageService::draft_seed(Some(payload.clone())), payload);
    }

    /// Only drafts accept updates.
    #[test]
    fn prop_only_drafts_editable(id in 1i64..10_000, status in arb_status()) {
        let result = HomepageService::ensure_editable(id, status);
        prop_assert_eq!(result.is_ok(), status == VersionStatus::Draft);
    }

    /// Any non-null payload is accepted as-is.
    #[test]
    fn prop_payload_passes_through(payload in arb_payload()) {
        prop_assert_eq!(HomepageService::require_payload(Some(&payload)).ok(), Some(&payload));
    }
}
