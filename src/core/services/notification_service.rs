// src/core/services/notification_service.rs
//
// Builds notification records from capsule state. Actual delivery (email,
// push) is an external concern; everything here is pure over an explicit
// `now` so the scheduler can be tested without a clock.

use crate::{
    error::CapsuleError,
    models::capsule::Capsule,
    models::common::{NotificationKind, Timestamp},
    models::notification::NotificationData,
    storage::{self, collections, DocumentStore},
    utils::crypto::generate_document_id,
};
use chrono::Duration;
use tracing::debug;

/// Reminder records for a capsule, one per configured reminder day that is
/// still in the future. A capsule already opened, or with reminders disabled,
/// produces none.
pub fn build_unlock_reminders(capsule: &Capsule, now: Timestamp) -> Vec<NotificationData> {
    if capsule.is_opened
        || (!capsule.notifications.email_reminders && !capsule.notifications.push_reminders)
    {
        return Vec::new();
    }

    let mut reminders: Vec<NotificationData> = capsule
        .notifications
        .reminder_days
        .iter()
        .filter_map(|days| {
            let scheduled_for = capsule.unlock_date - Duration::days(i64::from(*days));
            if scheduled_for <= now {
                return None;
            }
            Some(NotificationData {
                user_id: capsule.user_id.clone(),
                kind: NotificationKind::UnlockReminder,
                capsule_id: Some(capsule.id.clone()),
                title: "Capsule unlocking soon".to_string(),
                message: format!(
                    "\"{}\" unlocks in {} day{}.",
                    capsule.title,
                    days,
                    if *days == 1 { "" } else { "s" }
                ),
                scheduled_for: Some(scheduled_for),
                sent_at: None,
                read_at: None,
            })
        })
        .collect();
    reminders.sort_by_key(|r| r.scheduled_for);
    reminders
}

/// The "your capsule is ready" record, scheduled at the unlock date itself.
pub fn build_unlock_ready(capsule: &Capsule) -> NotificationData {
    NotificationData {
        user_id: capsule.user_id.clone(),
        kind: NotificationKind::UnlockReady,
        capsule_id: Some(capsule.id.clone()),
        title: "Capsule unlocked".to_string(),
        message: format!("\"{}\" is ready to open.", capsule.title),
        scheduled_for: Some(capsule.unlock_date),
        sent_at: None,
        read_at: None,
    }
}

/// Record announcing that a capsule was opened, sent immediately.
pub fn build_capsule_opened(capsule: &Capsule, now: Timestamp) -> NotificationData {
    NotificationData {
        user_id: capsule.user_id.clone(),
        kind: NotificationKind::CapsuleOpened,
        capsule_id: Some(capsule.id.clone()),
        title: "Capsule opened".to_string(),
        message: format!("\"{}\" has been opened.", capsule.title),
        scheduled_for: None,
        sent_at: Some(now),
        read_at: None,
    }
}

/// Persists a batch of notification records.
pub fn store_notifications(
    store: &dyn DocumentStore,
    notifications: &[NotificationData],
) -> Result<Vec<String>, CapsuleError> {
    let mut ids = Vec::with_capacity(notifications.len());
    for notification in notifications {
        let id = generate_document_id();
        storage::put_typed(store, collections::NOTIFICATIONS, &id, notification)?;
        ids.push(id);
    }
    debug!(count = ids.len(), "notifications stored");
    Ok(ids)
}

/// Unread notifications for a user, soonest scheduled first.
pub fn list_unread(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<NotificationData>, CapsuleError> {
    let mut items: Vec<NotificationData> =
        storage::list_typed(store, collections::NOTIFICATIONS)?
            .into_iter()
            .map(|(_, n): (String, NotificationData)| n)
            .filter(|n| n.user_id == user_id && n.read_at.is_none())
            .collect();
    items.sort_by_key(|n| n.scheduled_for);
    Ok(items)
}
