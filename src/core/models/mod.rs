// src/core/models/mod.rs
pub mod analytics;
pub mod capsule;
pub mod common;
pub mod content;
pub mod notification;
pub mod system;
pub mod user;

// Re-export common types/enums for easier access
pub use analytics::CapsuleAnalytics;
pub use capsule::{Capsule, CapsuleNotificationSettings, CapsulePrivacy};
pub use common::*;
pub use content::{Content, ContentData, ContentMetadata};
pub use notification::NotificationData;
pub use system::SystemConfig;
pub use user::{User, UserPreferences};
