// src/core/api.rs
//
// Typed input surface. Request structs mirror the wire form (camelCase) and
// carry declarative constraints; services call `validate_request` before
// touching storage. Time-relative rules (the unlock window) are not
// expressible as field attributes and are applied by the services against an
// explicit `now`.

use crate::error::CapsuleError;
use crate::models::capsule::{CapsuleNotificationSettings, CapsulePrivacy};
use crate::models::common::{AccountStatus, CapsuleStatus, ContentKind, SortOrder, Timestamp};
use crate::models::content::ContentData;
use crate::models::user::UserPreferences;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Maps declarative validation failures into the crate error type.
pub fn validate_request<T: Validate>(req: &T) -> Result<(), CapsuleError> {
    req.validate()
        .map_err(|e| CapsuleError::InvalidInput(e.to_string()))
}

fn validate_notification_settings(
    settings: &CapsuleNotificationSettings,
) -> Result<(), ValidationError> {
    crate::validation::fields::validate_reminder_days(&settings.reminder_days)
}

// User management

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    pub display_name: String,
    #[validate(url(message = "Invalid URL format"))]
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    #[serde(default)]
    pub display_name: Option<String>,
    #[validate(url(message = "Invalid URL format"))]
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    #[serde(default)]
    pub account_status: Option<AccountStatus>,
}

/// Replaces a user's preference block wholesale; absent optional fields
/// reset to their defaults.
#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPreferencesRequest {
    #[validate(length(min = 1))]
    pub id: String,
    pub preferences: UserPreferences,
}

// Capsules

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCapsuleRequest {
    #[validate(length(min = 1, max = 100, message = "Capsule title is required"))]
    pub title: String,
    #[validate(length(min = 10, max = 500, message = "Description must be 10-500 characters"))]
    pub description: String,
    /// `YYYY-MM-DD`; combined with `unlock_time` and checked against the
    /// unlock window at creation time.
    #[validate(custom(function = "crate::validation::fields::validate_date_string"))]
    pub unlock_date: String,
    /// `HH:MM`
    #[validate(custom(function = "crate::validation::fields::validate_time_of_day"))]
    pub unlock_time: String,
    #[validate(custom(function = "crate::validation::fields::validate_tag_list"))]
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(url(message = "Invalid URL format"))]
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub privacy: Option<CapsulePrivacy>,
    #[validate(custom(function = "validate_notification_settings"))]
    #[serde(default)]
    pub notifications: Option<CapsuleNotificationSettings>,
}

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCapsuleRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 100, message = "Capsule title is required"))]
    #[serde(default)]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 500, message = "Description must be 10-500 characters"))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "crate::validation::fields::validate_date_string"))]
    #[serde(default)]
    pub unlock_date: Option<String>,
    #[validate(custom(function = "crate::validation::fields::validate_time_of_day"))]
    #[serde(default)]
    pub unlock_time: Option<String>,
    #[validate(custom(function = "crate::validation::fields::validate_tag_list"))]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[validate(url(message = "Invalid URL format"))]
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub privacy: Option<CapsulePrivacy>,
    #[validate(custom(function = "validate_notification_settings"))]
    #[serde(default)]
    pub notifications: Option<CapsuleNotificationSettings>,
    #[serde(default)]
    pub status: Option<CapsuleStatus>,
}

// Content

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    #[validate(length(min = 1, message = "Capsule ID is required"))]
    pub capsule_id: String,
    /// Declared type; must agree with the payload variant, checked by the
    /// content service before the document is built.
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Display order within the capsule.
    #[serde(default)]
    pub order: u32,
    #[validate(custom(function = "crate::validation::fields::validate_content_data"))]
    pub data: ContentData,
}

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub order: Option<u32>,
    #[validate(custom(function = "crate::validation::fields::validate_content_data"))]
    #[serde(default)]
    pub data: Option<ContentData>,
    #[serde(default)]
    pub is_processed: Option<bool>,
    #[validate(url(message = "Invalid URL format"))]
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

// Pagination and search

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: default_page(),
            limit: default_limit(),
            sort_by: None,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(serde::Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit as u64) as u32;
        PageMeta {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total_pages > 0,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Capsules,
    Content,
    All,
}

impl Default for SearchScope {
    fn default() -> Self {
        SearchScope::All
    }
}

#[derive(serde::Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

fn validate_date_range(range: &DateRange) -> Result<(), ValidationError> {
    if range.start > range.end {
        let mut err = ValidationError::new("date_range_inverted");
        err.message = Some("Date range start must not be after its end".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Deserialize, Clone, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 100, message = "Search query is required"))]
    pub query: String,
    #[serde(default)]
    pub scope: SearchScope,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[validate(custom(function = "validate_date_range"))]
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_capsule_request_validates_fields() {
        let req = CreateCapsuleRequest {
            title: "Letters to 2040".into(),
            description: "Things I want to remember about this year.".into(),
            unlock_date: "2031-06-15".into(),
            unlock_time: "12:00".into(),
            tags: vec!["memories".into()],
            cover_image: None,
            privacy: None,
            notifications: None,
        };
        assert!(validate_request(&req).is_ok());

        let mut bad = req.clone();
        bad.description = "short".into();
        assert!(matches!(
            validate_request(&bad),
            Err(CapsuleError::InvalidInput(_))
        ));

        let mut bad = req.clone();
        bad.unlock_time = "25:00".into();
        assert!(validate_request(&bad).is_err());

        let mut bad = req;
        bad.tags = (0..11).map(|i| format!("t{i}")).collect();
        assert!(validate_request(&bad).is_err());
    }

    #[test]
    fn reminder_days_checked_through_the_request() {
        let req = CreateCapsuleRequest {
            title: "Letters to 2040".into(),
            description: "Things I want to remember about this year.".into(),
            unlock_date: "2031-06-15".into(),
            unlock_time: "12:00".into(),
            tags: vec![],
            cover_image: None,
            privacy: None,
            notifications: Some(CapsuleNotificationSettings {
                reminder_days: vec![0, 7],
                ..Default::default()
            }),
        };
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn create_user_request_checks_email_and_url() {
        let req = CreateUserRequest {
            email: "someone@example.com".into(),
            display_name: "Someone".into(),
            profile_picture: Some("https://example.com/p.png".into()),
            preferences: None,
        };
        assert!(validate_request(&req).is_ok());

        let mut bad = req.clone();
        bad.email = "nope".into();
        assert!(validate_request(&bad).is_err());

        let mut bad = req;
        bad.profile_picture = Some("not a url".into());
        assert!(validate_request(&bad).is_err());
    }

    #[test]
    fn content_request_deserializes_wire_form() {
        let req: CreateContentRequest = serde_json::from_value(json!({
            "capsuleId": "c-1",
            "type": "image",
            "order": 2,
            "data": {
                "type": "image",
                "data": {
                    "url": "https://storage.example.com/photo.jpg",
                    "fileName": "photo.jpg",
                    "fileSize": 2048,
                    "mimeType": "image/jpeg"
                }
            }
        }))
        .unwrap();
        assert_eq!(req.kind, ContentKind::Image);
        assert_eq!(req.order, 2);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn page_meta_math() {
        let meta = PageMeta::new(2, 20, 45);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let meta = PageMeta::new(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn page_request_rejects_out_of_range_limit() {
        let req = PageRequest {
            limit: 101,
            ..PageRequest::default()
        };
        assert!(validate_request(&req).is_err());
        assert!(validate_request(&PageRequest::default()).is_ok());
    }

    #[test]
    fn search_request_date_range_order() {
        use chrono::{Duration, Utc};
        let now = Utc::now();
        let req = SearchRequest {
            query: "beach".into(),
            scope: SearchScope::All,
            tags: None,
            date_range: Some(DateRange {
                start: now,
                end: now - Duration::days(1),
            }),
        };
        assert!(validate_request(&req).is_err());
    }
}
