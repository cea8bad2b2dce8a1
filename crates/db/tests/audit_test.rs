//! Integration tests for Audit repository.

use larder_core::audit::{AuditAction, AuditEntity};
use larder_core::auth::UserRole;
use larder_db::{AuditRepository, NewAuditEntry, UserRepository};
use serde_json::json;

#[tokio::test]
async fn test_list_newest_first_with_user_email() {
    let db = larder_db::connect_in_memory().await.unwrap();
    let user = UserRepository::new(db.clone())
        .register("a@x.com", "h", UserRole::Master)
        .await
        .unwrap();
    let repo = AuditRepository::new(db.clone());

    repo.record(NewAuditEntry::new(user.id, AuditAction::UpdateLead, AuditEntity::Lead, 1))
        .await;
    repo.record(
        NewAuditEntry::new(user.id, AuditAction::UpdateLead, AuditEntity::Lead, 2)
            .with_meta(json!({"status": "won"})),
    )
    .await;

    let entries = repo.list(100).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entity_id, Some(2));
    assert_eq!(entries[0].meta, Some(json!({"status": "won"})));
    assert_eq!(entries[0].user_email.as_deref(), Some("a@x.com"));
    assert_eq!(entries[1].meta, None);

    assert_eq!(repo.list(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_record_swallows_failures() {
    let db = larder_db::connect_in_memory().await.unwrap();
    let repo = AuditRepository::new(db);

    // user 77 does not exist, so the foreign key rejects the insert
    repo.record(NewAuditEntry::new(77, AuditAction::UpdateLead, AuditEntity::Lead, 1))
        .await;

    assert!(repo.list(10).await.unwrap().is_empty());
}
