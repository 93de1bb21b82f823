// src/core/services/capsule_service.rs
use crate::{
    api::{validate_request, CreateCapsuleRequest, UpdateCapsuleRequest},
    error::CapsuleError,
    models::analytics::CapsuleAnalytics,
    models::capsule::Capsule,
    models::common::{CapsuleId, CapsuleStatus, Timestamp},
    models::content::Content,
    models::system::SystemConfig,
    storage::{self, collections, DocumentStore},
    utils::crypto::generate_document_id,
    utils::time,
    validation::fields,
};
use tracing::{debug, info};

fn validation_message(error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

fn require_capsule(store: &dyn DocumentStore, id: &str) -> Result<Capsule, CapsuleError> {
    storage::get_typed(store, collections::CAPSULES, id)?
        .ok_or_else(|| CapsuleError::CapsuleNotFound(id.to_string()))
}

fn require_owned_capsule(
    store: &dyn DocumentStore,
    id: &str,
    user_id: &str,
) -> Result<Capsule, CapsuleError> {
    let capsule = require_capsule(store, id)?;
    if capsule.user_id != user_id {
        return Err(CapsuleError::NotAuthorized(format!(
            "capsule {id} is not owned by {user_id}"
        )));
    }
    Ok(capsule)
}

/// Combines the request's date and time fields and checks the unlock window.
fn resolve_unlock_date(
    date: &str,
    time_of_day: &str,
    now: Timestamp,
) -> Result<Timestamp, CapsuleError> {
    let unlock_at = time::parse_date_time(date, time_of_day)
        .ok_or_else(|| CapsuleError::InvalidInput("Please enter a valid date".to_string()))?;
    fields::validate_unlock_window(unlock_at, now)
        .map_err(|e| CapsuleError::InvalidInput(validation_message(&e)))?;
    Ok(unlock_at)
}

/// Creates a new capsule for `user_id`.
///
/// # Returns
/// * The stored `Capsule` in its initial state: draft, unsealed, unopened,
///   zero content items.
pub fn create_capsule(
    store: &dyn DocumentStore,
    config: &SystemConfig,
    req: &CreateCapsuleRequest,
    user_id: &str,
    now: Timestamp,
) -> Result<Capsule, CapsuleError> {
    if config.maintenance_mode {
        return Err(CapsuleError::MaintenanceMode);
    }
    validate_request(req)?;

    let unlock_date = resolve_unlock_date(&req.unlock_date, &req.unlock_time, now)?;

    let owned = list_user_capsules(store, user_id)?.len() as u32;
    if owned >= config.max_capsules_per_user {
        return Err(CapsuleError::CapsuleLimitReached);
    }

    let capsule = Capsule {
        id: generate_document_id(),
        title: req.title.clone(),
        description: req.description.clone(),
        user_id: user_id.to_string(),
        unlock_date,
        is_sealed: false,
        is_opened: false,
        tags: req.tags.clone(),
        content_count: 0,
        cover_image: req.cover_image.clone(),
        privacy: req.privacy.clone().unwrap_or_default(),
        notifications: req.notifications.clone().unwrap_or_default(),
        status: CapsuleStatus::Draft,
        created_at: now,
        updated_at: Some(now),
    };

    storage::put_typed(store, collections::CAPSULES, &capsule.id, &capsule)?;
    info!(capsule = %capsule.id, user = user_id, "capsule created");
    Ok(capsule)
}

/// Fetches a capsule for `requester`. Private capsules are only visible to
/// their owner; enforcement beyond that lives in database security rules.
pub fn get_capsule(
    store: &dyn DocumentStore,
    id: &str,
    requester: &str,
) -> Result<Capsule, CapsuleError> {
    let capsule = require_capsule(store, id)?;
    if capsule.privacy.is_private && capsule.user_id != requester {
        return Err(CapsuleError::NotAuthorized(format!(
            "capsule {id} is private"
        )));
    }
    Ok(capsule)
}

/// All capsules owned by `user_id`, newest first.
pub fn list_user_capsules(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<Capsule>, CapsuleError> {
    let mut capsules: Vec<Capsule> = storage::list_typed(store, collections::CAPSULES)?
        .into_iter()
        .map(|(_, capsule): (String, Capsule)| capsule)
        .filter(|capsule| capsule.user_id == user_id)
        .collect();
    capsules.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(capsules)
}

/// Applies a partial update. Once a capsule is sealed its unlock date is
/// immutable; a new unlock date on an unsealed capsule is re-checked against
/// the unlock window.
pub fn update_capsule(
    store: &dyn DocumentStore,
    req: &UpdateCapsuleRequest,
    user_id: &str,
    now: Timestamp,
) -> Result<Capsule, CapsuleError> {
    validate_request(req)?;
    let mut capsule = require_owned_capsule(store, &req.id, user_id)?;

    if req.unlock_date.is_some() || req.unlock_time.is_some() {
        if capsule.is_sealed {
            return Err(CapsuleError::CapsuleSealed);
        }
        let date = req.unlock_date.as_deref().ok_or_else(|| {
            CapsuleError::InvalidInput(
                "An unlock date is required when changing the unlock time".to_string(),
            )
        })?;
        let time_of_day = req.unlock_time.as_deref().unwrap_or("00:00");
        capsule.unlock_date = resolve_unlock_date(date, time_of_day, now)?;
    }

    if let Some(title) = &req.title {
        capsule.title = title.clone();
    }
    if let Some(description) = &req.description {
        capsule.description = description.clone();
    }
    if let Some(tags) = &req.tags {
        capsule.tags = tags.clone();
    }
    if let Some(cover_image) = &req.cover_image {
        capsule.cover_image = Some(cover_image.clone());
    }
    if let Some(privacy) = &req.privacy {
        capsule.privacy = privacy.clone();
    }
    if let Some(notifications) = &req.notifications {
        capsule.notifications = notifications.clone();
    }
    if let Some(status) = req.status {
        capsule.status = status;
    }
    capsule.updated_at = Some(now);

    storage::put_typed(store, collections::CAPSULES, &req.id, &capsule)?;
    Ok(capsule)
}

/// Seals a capsule: content is finalized and the unlock date can no longer
/// change. Sealing twice is a no-op.
pub fn seal_capsule(
    store: &dyn DocumentStore,
    id: &str,
    user_id: &str,
    now: Timestamp,
) -> Result<Capsule, CapsuleError> {
    let mut capsule = require_owned_capsule(store, id, user_id)?;
    if capsule.is_sealed {
        return Ok(capsule);
    }

    capsule.is_sealed = true;
    if capsule.status == CapsuleStatus::Draft {
        capsule.status = CapsuleStatus::Active;
    }
    capsule.updated_at = Some(now);

    storage::put_typed(store, collections::CAPSULES, id, &capsule)?;
    info!(capsule = id, "capsule sealed");
    Ok(capsule)
}

/// Opens a capsule once its unlock date has passed. The time lock is a
/// stored timestamp compared against the clock; before that moment this
/// returns `CapsuleLocked`.
pub fn open_capsule(
    store: &dyn DocumentStore,
    id: &str,
    user_id: &str,
    now: Timestamp,
) -> Result<Capsule, CapsuleError> {
    let mut capsule = require_owned_capsule(store, id, user_id)?;
    if !capsule.is_unlocked(now) {
        debug!(capsule = id, unlock = %capsule.unlock_date, "open refused, still locked");
        return Err(CapsuleError::CapsuleLocked);
    }

    capsule.is_opened = true;
    capsule.status = CapsuleStatus::Unlocked;
    capsule.updated_at = Some(now);
    storage::put_typed(store, collections::CAPSULES, id, &capsule)?;

    let mut analytics = load_analytics(store, id)?;
    analytics.open_count += 1;
    analytics.last_viewed = Some(now);
    storage::put_typed(store, collections::ANALYTICS, id, &analytics)?;

    info!(capsule = id, "capsule opened");
    Ok(capsule)
}

/// Deletes a capsule together with its content items and analytics record,
/// so nothing keyed by the capsule is left behind.
pub fn delete_capsule(
    store: &dyn DocumentStore,
    id: &str,
    user_id: &str,
) -> Result<(), CapsuleError> {
    require_owned_capsule(store, id, user_id)?;

    let contents: Vec<(String, Content)> = storage::list_typed(store, collections::CONTENT)?;
    for (content_id, content) in contents {
        if content.capsule_id == id {
            store.remove(collections::CONTENT, &content_id)?;
        }
    }
    store.remove(collections::ANALYTICS, id)?;
    store.remove(collections::CAPSULES, id)?;
    info!(capsule = id, "capsule deleted");
    Ok(())
}

fn load_analytics(
    store: &dyn DocumentStore,
    capsule_id: &str,
) -> Result<CapsuleAnalytics, CapsuleError> {
    Ok(storage::get_typed(store, collections::ANALYTICS, capsule_id)?
        .unwrap_or_else(|| CapsuleAnalytics::new(capsule_id)))
}

/// Records a view in the capsule's analytics record.
pub fn record_view(
    store: &dyn DocumentStore,
    capsule_id: &CapsuleId,
    now: Timestamp,
) -> Result<CapsuleAnalytics, CapsuleError> {
    let mut analytics = load_analytics(store, capsule_id)?;
    analytics.view_count += 1;
    analytics.last_viewed = Some(now);
    storage::put_typed(store, collections::ANALYTICS, capsule_id, &analytics)?;
    Ok(analytics)
}

/// Records a share in the capsule's analytics record.
pub fn record_share(
    store: &dyn DocumentStore,
    capsule_id: &CapsuleId,
) -> Result<CapsuleAnalytics, CapsuleError> {
    let mut analytics = load_analytics(store, capsule_id)?;
    analytics.share_count += 1;
    storage::put_typed(store, collections::ANALYTICS, capsule_id, &analytics)?;
    Ok(analytics)
}
