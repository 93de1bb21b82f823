// src/core/services/content_service.rs
use crate::{
    api::{validate_request, CreateContentRequest, UpdateContentRequest},
    error::CapsuleError,
    models::capsule::Capsule,
    models::common::Timestamp,
    models::content::Content,
    models::system::SystemConfig,
    storage::{self, collections, DocumentStore},
    utils::crypto::{generate_document_id, sha256_hex},
};
use serde_json::{json, Map};
use tracing::info;

fn require_owned_capsule(
    store: &dyn DocumentStore,
    capsule_id: &str,
    user_id: &str,
) -> Result<Capsule, CapsuleError> {
    let capsule: Capsule = storage::get_typed(store, collections::CAPSULES, capsule_id)?
        .ok_or_else(|| CapsuleError::CapsuleNotFound(capsule_id.to_string()))?;
    if capsule.user_id != user_id {
        return Err(CapsuleError::NotAuthorized(format!(
            "capsule {capsule_id} is not owned by {user_id}"
        )));
    }
    Ok(capsule)
}

fn require_content(store: &dyn DocumentStore, id: &str) -> Result<Content, CapsuleError> {
    storage::get_typed(store, collections::CONTENT, id)?
        .ok_or_else(|| CapsuleError::ContentNotFound(id.to_string()))
}

/// Checks an uploaded payload against the system limits.
fn check_file_limits(config: &SystemConfig, content: &Content) -> Result<(), CapsuleError> {
    if let Some(size) = content.data.file_size() {
        if size > config.max_file_size {
            return Err(CapsuleError::FileTooLarge {
                size,
                max: config.max_file_size,
            });
        }
    }
    if let Some(mime) = content.data.mime_type() {
        if !config.is_file_type_allowed(mime) {
            return Err(CapsuleError::FileTypeNotAllowed(mime.to_string()));
        }
    }
    Ok(())
}

fn set_content_count(
    store: &dyn DocumentStore,
    capsule_id: &str,
    count: u32,
    now: Timestamp,
) -> Result<(), CapsuleError> {
    let mut patch = Map::new();
    patch.insert("contentCount".to_string(), json!(count));
    patch.insert("updatedAt".to_string(), json!(now));
    store.update(collections::CAPSULES, capsule_id, patch)
}

/// Adds a content item to a capsule.
///
/// The declared `type` must agree with the payload variant; sealed capsules
/// reject new content; uploads are checked against the size and MIME limits.
/// The parent's `contentCount` is kept in step with the item count.
///
/// # Returns
/// * The stored `Content` document.
pub fn add_content(
    store: &dyn DocumentStore,
    config: &SystemConfig,
    req: &CreateContentRequest,
    user_id: &str,
    now: Timestamp,
) -> Result<Content, CapsuleError> {
    if config.maintenance_mode {
        return Err(CapsuleError::MaintenanceMode);
    }
    validate_request(req)?;

    if req.data.kind() != req.kind {
        return Err(CapsuleError::InvalidInput(format!(
            "declared type {:?} does not match payload {:?}",
            req.kind,
            req.data.kind()
        )));
    }

    let capsule = require_owned_capsule(store, &req.capsule_id, user_id)?;
    if capsule.is_sealed {
        return Err(CapsuleError::CapsuleSealed);
    }
    if capsule.content_count >= config.max_content_per_capsule {
        return Err(CapsuleError::ContentLimitReached);
    }

    let content = Content {
        id: generate_document_id(),
        capsule_id: req.capsule_id.clone(),
        order: req.order,
        data: req.data.clone(),
        is_processed: req.data.is_text(),
        thumbnail_url: None,
        created_at: now,
        updated_at: Some(now),
    };
    check_file_limits(config, &content)?;

    storage::put_typed(store, collections::CONTENT, &content.id, &content)?;
    set_content_count(store, &capsule.id, capsule.content_count + 1, now)?;
    info!(content = %content.id, capsule = %capsule.id, kind = ?content.kind(), "content added");
    Ok(content)
}

pub fn get_content(store: &dyn DocumentStore, id: &str) -> Result<Content, CapsuleError> {
    require_content(store, id)
}

/// Content items of a capsule in display order.
pub fn list_capsule_content(
    store: &dyn DocumentStore,
    capsule_id: &str,
) -> Result<Vec<Content>, CapsuleError> {
    let mut items: Vec<Content> = storage::list_typed(store, collections::CONTENT)?
        .into_iter()
        .map(|(_, content): (String, Content)| content)
        .filter(|content| content.capsule_id == capsule_id)
        .collect();
    items.sort_by_key(|content| content.order);
    Ok(items)
}

/// Applies a partial update to a content item. A replaced payload must keep
/// the item's type and is re-checked against the upload limits.
pub fn update_content(
    store: &dyn DocumentStore,
    config: &SystemConfig,
    req: &UpdateContentRequest,
    user_id: &str,
    now: Timestamp,
) -> Result<Content, CapsuleError> {
    validate_request(req)?;
    let mut content = require_content(store, &req.id)?;
    let capsule = require_owned_capsule(store, &content.capsule_id, user_id)?;
    if capsule.is_sealed {
        return Err(CapsuleError::CapsuleSealed);
    }

    if let Some(data) = &req.data {
        if data.kind() != content.kind() {
            return Err(CapsuleError::InvalidInput(format!(
                "content {} is {:?}, payload is {:?}",
                req.id,
                content.kind(),
                data.kind()
            )));
        }
        content.data = data.clone();
    }
    if let Some(order) = req.order {
        content.order = order;
    }
    if let Some(is_processed) = req.is_processed {
        content.is_processed = is_processed;
    }
    if let Some(thumbnail_url) = &req.thumbnail_url {
        content.thumbnail_url = Some(thumbnail_url.clone());
    }
    content.updated_at = Some(now);
    check_file_limits(config, &content)?;

    storage::put_typed(store, collections::CONTENT, &req.id, &content)?;
    Ok(content)
}

/// Records the SHA-256 of an uploaded file once its bytes are available and
/// marks the item processed. Runs after the upload completes, so a sealed
/// capsule does not block it.
pub fn record_file_hash(
    store: &dyn DocumentStore,
    id: &str,
    bytes: &[u8],
    user_id: &str,
    now: Timestamp,
) -> Result<Content, CapsuleError> {
    let mut content = require_content(store, id)?;
    require_owned_capsule(store, &content.capsule_id, user_id)?;

    let hash = sha256_hex(bytes);
    if !content.data.set_file_hash(hash) {
        return Err(CapsuleError::InvalidInput(format!(
            "content {id} carries no file to hash"
        )));
    }
    content.is_processed = true;
    content.updated_at = Some(now);
    storage::put_typed(store, collections::CONTENT, id, &content)?;
    info!(content = id, "file hash recorded");
    Ok(content)
}

/// Removes a content item and decrements the parent's `contentCount`.
pub fn remove_content(
    store: &dyn DocumentStore,
    id: &str,
    user_id: &str,
    now: Timestamp,
) -> Result<(), CapsuleError> {
    let content = require_content(store, id)?;
    let capsule = require_owned_capsule(store, &content.capsule_id, user_id)?;
    if capsule.is_sealed {
        return Err(CapsuleError::CapsuleSealed);
    }

    store.remove(collections::CONTENT, id)?;
    set_content_count(store, &capsule.id, capsule.content_count.saturating_sub(1), now)?;
    info!(content = id, capsule = %capsule.id, "content removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CreateCapsuleRequest;
    use crate::models::common::ContentKind;
    use crate::models::content::{ContentData, MediaContentData, TextContentData};
    use crate::services::capsule_service;
    use crate::storage::MemoryStore;
    use chrono::{Duration, Utc};

    fn seed_capsule(store: &MemoryStore, config: &SystemConfig, now: Timestamp) -> Capsule {
        let req = CreateCapsuleRequest {
            title: "Letters to the future".into(),
            description: "Things I want to remember about this year.".into(),
            unlock_date: (now + Duration::days(30)).format("%Y-%m-%d").to_string(),
            unlock_time: "12:00".into(),
            tags: vec![],
            cover_image: None,
            privacy: None,
            notifications: None,
        };
        capsule_service::create_capsule(store, config, &req, "u-1", now).unwrap()
    }

    fn text_payload(text: &str) -> ContentData {
        ContentData::Text(TextContentData {
            text: text.into(),
            format: Default::default(),
        })
    }

    fn image_payload(file_size: u64, mime_type: &str) -> ContentData {
        ContentData::Image(MediaContentData {
            url: "https://storage.example.com/capsules/c-1/photo.jpg".into(),
            file_name: "photo.jpg".into(),
            file_size,
            mime_type: mime_type.into(),
            metadata: None,
        })
    }

    fn content_req(capsule_id: &str, kind: ContentKind, data: ContentData) -> CreateContentRequest {
        CreateContentRequest {
            capsule_id: capsule_id.into(),
            kind,
            order: 0,
            data,
        }
    }

    #[test]
    fn add_increments_content_count() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);

        let req = content_req(&capsule.id, ContentKind::Text, text_payload("hello"));
        let content = add_content(&store, &config, &req, "u-1", now).unwrap();
        assert!(content.is_processed);

        let stored: Capsule = storage::get_typed(&store, collections::CAPSULES, &capsule.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.content_count, 1);
    }

    #[test]
    fn declared_type_must_match_payload() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);

        let req = content_req(&capsule.id, ContentKind::Image, text_payload("hello"));
        let err = add_content(&store, &config, &req, "u-1", now).unwrap_err();
        assert!(matches!(err, CapsuleError::InvalidInput(_)));
    }

    #[test]
    fn sealed_capsule_rejects_content_changes() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);
        let req = content_req(&capsule.id, ContentKind::Text, text_payload("hello"));
        let content = add_content(&store, &config, &req, "u-1", now).unwrap();

        capsule_service::seal_capsule(&store, &capsule.id, "u-1", now).unwrap();

        let err = add_content(&store, &config, &req, "u-1", now).unwrap_err();
        assert_eq!(err, CapsuleError::CapsuleSealed);
        let err = remove_content(&store, &content.id, "u-1", now).unwrap_err();
        assert_eq!(err, CapsuleError::CapsuleSealed);
    }

    #[test]
    fn oversized_file_rejected() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);

        let req = content_req(
            &capsule.id,
            ContentKind::Image,
            image_payload(config.max_file_size + 1, "image/jpeg"),
        );
        let err = add_content(&store, &config, &req, "u-1", now).unwrap_err();
        assert!(matches!(err, CapsuleError::FileTooLarge { .. }));

        // Nothing was stored and the count is untouched.
        assert!(list_capsule_content(&store, &capsule.id).unwrap().is_empty());
    }

    #[test]
    fn disallowed_mime_type_rejected() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);

        let req = content_req(
            &capsule.id,
            ContentKind::Image,
            image_payload(1024, "application/x-msdownload"),
        );
        let err = add_content(&store, &config, &req, "u-1", now).unwrap_err();
        assert!(matches!(err, CapsuleError::FileTypeNotAllowed(_)));
    }

    #[test]
    fn per_capsule_content_limit() {
        let (store, mut config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        config.max_content_per_capsule = 1;
        let capsule = seed_capsule(&store, &config, now);

        let req = content_req(&capsule.id, ContentKind::Text, text_payload("one"));
        add_content(&store, &config, &req, "u-1", now).unwrap();
        let err = add_content(&store, &config, &req, "u-1", now).unwrap_err();
        assert_eq!(err, CapsuleError::ContentLimitReached);
    }

    #[test]
    fn listing_follows_display_order() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);

        for order in [2u32, 0, 1] {
            let mut req =
                content_req(&capsule.id, ContentKind::Text, text_payload("entry"));
            req.order = order;
            add_content(&store, &config, &req, "u-1", now).unwrap();
        }
        let items = list_capsule_content(&store, &capsule.id).unwrap();
        let orders: Vec<u32> = items.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn remove_decrements_count() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);
        let req = content_req(&capsule.id, ContentKind::Text, text_payload("hello"));
        let content = add_content(&store, &config, &req, "u-1", now).unwrap();

        remove_content(&store, &content.id, "u-1", now).unwrap();
        let stored: Capsule = storage::get_typed(&store, collections::CAPSULES, &capsule.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.content_count, 0);
        assert!(matches!(
            get_content(&store, &content.id).unwrap_err(),
            CapsuleError::ContentNotFound(_)
        ));
    }

    #[test]
    fn file_hash_recorded_after_upload() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);
        let req = content_req(
            &capsule.id,
            ContentKind::Image,
            image_payload(3, "image/jpeg"),
        );
        let content = add_content(&store, &config, &req, "u-1", now).unwrap();
        assert!(content.data.file_hash().is_none());
        assert!(!content.is_processed);

        let hashed = record_file_hash(&store, &content.id, b"abc", "u-1", now).unwrap();
        assert_eq!(
            hashed.data.file_hash(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert!(hashed.is_processed);

        let stored = get_content(&store, &content.id).unwrap();
        assert_eq!(stored.data.file_hash(), hashed.data.file_hash());

        // Text entries carry no file to hash.
        let req = content_req(&capsule.id, ContentKind::Text, text_payload("hello"));
        let text = add_content(&store, &config, &req, "u-1", now).unwrap();
        let err = record_file_hash(&store, &text.id, b"abc", "u-1", now).unwrap_err();
        assert!(matches!(err, CapsuleError::InvalidInput(_)));
    }

    #[test]
    fn update_keeps_type_and_limits() {
        let (store, config, now) = (MemoryStore::new(), SystemConfig::default(), Utc::now());
        let capsule = seed_capsule(&store, &config, now);
        let req = content_req(
            &capsule.id,
            ContentKind::Image,
            image_payload(1024, "image/jpeg"),
        );
        let content = add_content(&store, &config, &req, "u-1", now).unwrap();

        let update = UpdateContentRequest {
            id: content.id.clone(),
            order: Some(5),
            data: Some(text_payload("now text")),
            is_processed: None,
            thumbnail_url: None,
        };
        let err = update_content(&store, &config, &update, "u-1", now).unwrap_err();
        assert!(matches!(err, CapsuleError::InvalidInput(_)));

        let update = UpdateContentRequest {
            id: content.id.clone(),
            order: Some(5),
            data: None,
            is_processed: Some(true),
            thumbnail_url: Some("https://cdn.example.com/t.jpg".into()),
        };
        let updated = update_content(&store, &config, &update, "u-1", now).unwrap();
        assert_eq!(updated.order, 5);
        assert!(updated.is_processed);
    }
}
