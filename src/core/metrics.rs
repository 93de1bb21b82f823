// src/core/metrics.rs
use crate::error::CapsuleError;
use crate::models::capsule::Capsule;
use crate::models::common::CapsuleStatus;
use crate::models::content::Content;
use crate::models::notification::NotificationData;
use crate::models::user::User;
use crate::storage::{self, collections, DocumentStore};
use serde::{Deserialize, Serialize};

/// Aggregate counters over the stored collections, for an admin dashboard.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetrics {
    pub total_users: u32,
    pub total_capsules: u32,
    pub draft_capsules: u32,
    pub active_capsules: u32,
    pub unlocked_capsules: u32,
    pub sealed_capsules: u32,
    pub opened_capsules: u32,
    pub total_content_items: u32,
    pub storage_used_bytes: u64,
    pub total_notifications: u32,
}

impl ServiceMetrics {
    fn record_capsule(&mut self, capsule: &Capsule) {
        self.total_capsules = self.total_capsules.saturating_add(1);
        match capsule.status {
            CapsuleStatus::Draft => {
                self.draft_capsules = self.draft_capsules.saturating_add(1)
            }
            CapsuleStatus::Active => {
                self.active_capsules = self.active_capsules.saturating_add(1)
            }
            CapsuleStatus::Unlocked => {
                self.unlocked_capsules = self.unlocked_capsules.saturating_add(1)
            }
            CapsuleStatus::Archived => {}
        }
        if capsule.is_sealed {
            self.sealed_capsules = self.sealed_capsules.saturating_add(1);
        }
        if capsule.is_opened {
            self.opened_capsules = self.opened_capsules.saturating_add(1);
        }
    }

    fn record_content(&mut self, content: &Content) {
        self.total_content_items = self.total_content_items.saturating_add(1);
        if let Some(size) = content.data.file_size() {
            self.storage_used_bytes = self.storage_used_bytes.saturating_add(size);
        }
    }
}

/// Scans the collections and produces current counters.
pub fn collect(store: &dyn DocumentStore) -> Result<ServiceMetrics, CapsuleError> {
    let mut metrics = ServiceMetrics {
        total_users: storage::list_typed::<User>(store, collections::USERS)?.len() as u32,
        ..ServiceMetrics::default()
    };
    for (_, capsule) in storage::list_typed::<Capsule>(store, collections::CAPSULES)? {
        metrics.record_capsule(&capsule);
    }
    for (_, content) in storage::list_typed::<Content>(store, collections::CONTENT)? {
        metrics.record_content(&content);
    }
    metrics.total_notifications =
        storage::list_typed::<NotificationData>(store, collections::NOTIFICATIONS)?.len() as u32;
    Ok(metrics)
}
