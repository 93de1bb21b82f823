// src/core/models/capsule.rs
use crate::models::common::{CapsuleId, CapsuleStatus, Timestamp, UserId, Visibility};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_reminder_days() -> Vec<u32> {
    vec![7, 3, 1]
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapsulePrivacy {
    #[serde(default)]
    pub is_private: bool,
    #[serde(default = "default_true")]
    pub allow_comments: bool,
    #[serde(default = "default_true")]
    pub allow_shares: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Default for CapsulePrivacy {
    fn default() -> Self {
        CapsulePrivacy {
            is_private: false,
            allow_comments: true,
            allow_shares: true,
            visibility: Visibility::Private,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleNotificationSettings {
    /// Days before the unlock date on which to remind the owner.
    #[serde(default = "default_reminder_days")]
    pub reminder_days: Vec<u32>,
    #[serde(default = "default_true")]
    pub email_reminders: bool,
    #[serde(default)]
    pub push_reminders: bool,
}

impl Default for CapsuleNotificationSettings {
    fn default() -> Self {
        CapsuleNotificationSettings {
            reminder_days: default_reminder_days(),
            email_reminders: true,
            push_reminders: false,
        }
    }
}

/// A capsule document as stored in the `capsules` collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    pub id: CapsuleId,
    pub title: String,
    pub description: String,
    pub user_id: UserId,
    pub unlock_date: Timestamp,
    pub is_sealed: bool,
    pub is_opened: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub privacy: CapsulePrivacy,
    #[serde(default)]
    pub notifications: CapsuleNotificationSettings,
    pub status: CapsuleStatus,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Capsule {
    /// True once the wall clock has passed the unlock date.
    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        now >= self.unlock_date
    }

    /// Whole days remaining until unlock; 0 once unlocked.
    pub fn days_until_unlock(&self, now: Timestamp) -> i64 {
        (self.unlock_date - now).num_days().max(0)
    }
}
