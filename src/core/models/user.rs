// src/core/models/user.rs
use crate::models::common::{AccountStatus, Theme, Timestamp, UserId, UserRole};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            email_notifications: true,
            theme: Theme::Light,
            language: None,
            timezone: None,
        }
    }
}

/// A user document as stored in the `users` collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub last_active: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub is_email_verified: bool,
    pub account_status: AccountStatus,
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::SuperAdmin)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
