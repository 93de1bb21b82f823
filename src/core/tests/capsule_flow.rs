// src/core/tests/capsule_flow.rs
//
// End-to-end walk through the capsule lifecycle against the in-memory store:
// account creation, capsule creation, content upload, sealing, the time lock,
// and opening once the unlock date has passed.

use chrono::{Duration, Utc};
use timecapsule_core::api::{CreateCapsuleRequest, CreateContentRequest, CreateUserRequest};
use timecapsule_core::error::CapsuleError;
use timecapsule_core::metrics;
use timecapsule_core::models::common::{CapsuleStatus, ContentKind};
use timecapsule_core::models::content::{ContentData, MediaContentData, TextContentData};
use timecapsule_core::models::system::SystemConfig;
use timecapsule_core::services::{capsule_service, content_service, notification_service, user_service};
use timecapsule_core::storage::MemoryStore;

#[test]
fn full_capsule_lifecycle() {
    let store = MemoryStore::new();
    let config = SystemConfig::default();
    let now = Utc::now();

    // Account
    let user = user_service::create_user(
        &store,
        "u-1",
        &CreateUserRequest {
            email: "future@example.com".into(),
            display_name: "Future Me".into(),
            profile_picture: None,
            preferences: None,
        },
        now,
    )
    .unwrap();
    assert_eq!(user.id, "u-1");

    // Capsule, unlocking in 30 days
    let capsule = capsule_service::create_capsule(
        &store,
        &config,
        &CreateCapsuleRequest {
            title: "Letters to 2026".into(),
            description: "Everything I want to tell myself next year.".into(),
            unlock_date: (now + Duration::days(30)).format("%Y-%m-%d").to_string(),
            unlock_time: "09:00".into(),
            tags: vec!["letters".into(), "year-review".into()],
            cover_image: None,
            privacy: None,
            notifications: None,
        },
        "u-1",
        now,
    )
    .unwrap();
    assert_eq!(capsule.status, CapsuleStatus::Draft);

    // Content: one letter, one photo
    content_service::add_content(
        &store,
        &config,
        &CreateContentRequest {
            capsule_id: capsule.id.clone(),
            kind: ContentKind::Text,
            order: 0,
            data: ContentData::Text(TextContentData {
                text: "Dear future me, remember this summer.".into(),
                format: Default::default(),
            }),
        },
        "u-1",
        now,
    )
    .unwrap();
    content_service::add_content(
        &store,
        &config,
        &CreateContentRequest {
            capsule_id: capsule.id.clone(),
            kind: ContentKind::Image,
            order: 1,
            data: ContentData::Image(MediaContentData {
                url: "https://storage.example.com/capsules/photo.jpg".into(),
                file_name: "photo.jpg".into(),
                file_size: 2 * 1024 * 1024,
                mime_type: "image/jpeg".into(),
                metadata: None,
            }),
        },
        "u-1",
        now,
    )
    .unwrap();

    let items = content_service::list_capsule_content(&store, &capsule.id).unwrap();
    assert_eq!(items.len(), 2);

    // Seal: content frozen, unlock date immutable from here on
    let sealed = capsule_service::seal_capsule(&store, &capsule.id, "u-1", now).unwrap();
    assert!(sealed.is_sealed);
    assert_eq!(sealed.status, CapsuleStatus::Active);

    // Reminders exist for the configured days ahead of the unlock date
    let reminders = notification_service::build_unlock_reminders(&sealed, now);
    assert_eq!(reminders.len(), 3);
    notification_service::store_notifications(&store, &reminders).unwrap();
    assert_eq!(
        notification_service::list_unread(&store, "u-1").unwrap().len(),
        3
    );

    // Opening early is refused by the time lock
    let err = capsule_service::open_capsule(&store, &capsule.id, "u-1", now).unwrap_err();
    assert_eq!(err, CapsuleError::CapsuleLocked);

    // Past the unlock date the capsule opens and analytics record it
    let later = now + Duration::days(31);
    let opened = capsule_service::open_capsule(&store, &capsule.id, "u-1", later).unwrap();
    assert!(opened.is_opened);
    assert_eq!(opened.status, CapsuleStatus::Unlocked);

    let snapshot = metrics::collect(&store).unwrap();
    assert_eq!(snapshot.total_users, 1);
    assert_eq!(snapshot.total_capsules, 1);
    assert_eq!(snapshot.unlocked_capsules, 1);
    assert_eq!(snapshot.opened_capsules, 1);
    assert_eq!(snapshot.total_content_items, 2);
    assert_eq!(snapshot.storage_used_bytes, 2 * 1024 * 1024);
    assert_eq!(snapshot.total_notifications, 3);
}

#[test]
fn deleting_a_capsule_cascades() {
    let store = MemoryStore::new();
    let config = SystemConfig::default();
    let now = Utc::now();

    let capsule = capsule_service::create_capsule(
        &store,
        &config,
        &CreateCapsuleRequest {
            title: "Scratch capsule".into(),
            description: "Capsule that is about to be deleted.".into(),
            unlock_date: (now + Duration::days(10)).format("%Y-%m-%d").to_string(),
            unlock_time: "00:00".into(),
            tags: vec![],
            cover_image: None,
            privacy: None,
            notifications: None,
        },
        "u-1",
        now,
    )
    .unwrap();
    content_service::add_content(
        &store,
        &config,
        &CreateContentRequest {
            capsule_id: capsule.id.clone(),
            kind: ContentKind::Text,
            order: 0,
            data: ContentData::Text(TextContentData {
                text: "ephemeral".into(),
                format: Default::default(),
            }),
        },
        "u-1",
        now,
    )
    .unwrap();
    capsule_service::record_view(&store, &capsule.id, now).unwrap();

    capsule_service::delete_capsule(&store, &capsule.id, "u-1").unwrap();

    assert!(matches!(
        capsule_service::get_capsule(&store, &capsule.id, "u-1").unwrap_err(),
        CapsuleError::CapsuleNotFound(_)
    ));
    assert!(content_service::list_capsule_content(&store, &capsule.id)
        .unwrap()
        .is_empty());

    let snapshot = metrics::collect(&store).unwrap();
    assert_eq!(snapshot.total_capsules, 0);
    assert_eq!(snapshot.total_content_items, 0);
}
