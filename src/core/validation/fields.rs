// src/core/validation/fields.rs
//
// Atomic field predicates. Each takes a candidate value (plus `now` where
// the rule is time-relative), has no side effects, and returns a
// `ValidationError` carrying a code and a human-readable message on failure.
// Higher-level schemas compose these with cardinality constraints.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use validator::{ValidateEmail, ValidateUrl, ValidationError};

use crate::models::content::ContentData;

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 100;
pub const DISPLAY_NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const TAG_MAX_LEN: usize = 20;
pub const MAX_TAGS: usize = 10;
pub const FORM_TEXT_MAX_LEN: usize = 2_000;
pub const TEXT_BODY_MAX_LEN: usize = 50_000;
pub const FILE_NAME_MAX_LEN: usize = 255;
pub const MAX_FILES: usize = 10;
pub const MAX_FORM_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const MIN_UNLOCK_LEAD_DAYS: i64 = 1;
pub const MAX_UNLOCK_HORIZON_MONTHS: u32 = 240; // 20 calendar years

static MIME_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9!#$&\-\^_]*/[a-zA-Z0-9][a-zA-Z0-9!#$&\-\^_]*$")
        .expect("mime type regex")
});

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("time of day regex"));

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(field_error("email", "Invalid email format"))
    }
}

pub fn validate_url_field(url: &str) -> Result<(), ValidationError> {
    if url.validate_url() {
        Ok(())
    } else {
        Err(field_error("url", "Invalid URL format"))
    }
}

pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(field_error("display_name_required", "Display name is required"));
    }
    if name.chars().count() > DISPLAY_NAME_MAX_LEN {
        return Err(field_error("display_name_too_long", "Display name too long"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(field_error("title_required", "Capsule title is required"));
    }
    let len = title.chars().count();
    if len < TITLE_MIN_LEN {
        return Err(field_error(
            "title_too_short",
            "Title must be at least 3 characters long",
        ));
    }
    if len > TITLE_MAX_LEN {
        return Err(field_error(
            "title_too_long",
            "Title cannot exceed 100 characters",
        ));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(field_error("description_required", "Description is required"));
    }
    let len = description.chars().count();
    if len < DESCRIPTION_MIN_LEN {
        return Err(field_error(
            "description_too_short",
            "Description must be at least 10 characters long",
        ));
    }
    if len > DESCRIPTION_MAX_LEN {
        return Err(field_error(
            "description_too_long",
            "Description cannot exceed 500 characters",
        ));
    }
    Ok(())
}

pub fn validate_tag(tag: &str) -> Result<(), ValidationError> {
    if tag.trim().is_empty() {
        return Err(field_error("tag_empty", "Tag cannot be empty"));
    }
    if tag.chars().count() > TAG_MAX_LEN {
        return Err(field_error(
            "tag_too_long",
            "Each tag cannot exceed 20 characters",
        ));
    }
    Ok(())
}

/// Whole tag list: at most 10 tags, each individually valid. The list is
/// never truncated; the caller decides whether the failure blocks.
pub fn validate_tag_list(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(field_error(
            "too_many_tags",
            "You can add a maximum of 10 tags",
        ));
    }
    for tag in tags {
        validate_tag(tag)?;
    }
    Ok(())
}

pub fn validate_time_of_day(time: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY_RE.is_match(time) {
        Ok(())
    } else {
        Err(field_error(
            "time_invalid",
            "Please enter a valid time (HH:MM)",
        ))
    }
}

pub fn validate_date_string(date: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(field_error("date_invalid", "Please enter a valid date"))
    }
}

pub fn validate_mime_type(mime_type: &str) -> Result<(), ValidationError> {
    if MIME_TYPE_RE.is_match(mime_type) {
        Ok(())
    } else {
        Err(field_error("mime_type_invalid", "Invalid MIME type"))
    }
}

pub fn validate_file_size(size: u64, max: u64) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(field_error("file_size_zero", "File size must be positive"));
    }
    if size > max {
        return Err(field_error("file_too_large", "File too large"));
    }
    Ok(())
}

/// Reminder days are offsets before the unlock date, between 1 and 30.
pub fn validate_reminder_days(days: &[u32]) -> Result<(), ValidationError> {
    if days.iter().any(|d| *d == 0 || *d > 30) {
        return Err(field_error(
            "reminder_days_out_of_range",
            "Reminder days must be between 1 and 30",
        ));
    }
    Ok(())
}

/// The unlock window rule: pass iff `now < d <= now + 20 years` and
/// `d >= now + 1 day`. The three failure modes are reported distinctly.
pub fn validate_unlock_window(
    unlock_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if unlock_at <= now {
        return Err(field_error(
            "unlock_in_past",
            "Unlock date must be in the future",
        ));
    }
    if unlock_at < now + Duration::days(MIN_UNLOCK_LEAD_DAYS) {
        return Err(field_error(
            "unlock_too_soon",
            "Unlock date must be at least 1 day in the future",
        ));
    }
    let horizon = now
        .checked_add_months(Months::new(MAX_UNLOCK_HORIZON_MONTHS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    if unlock_at > horizon {
        return Err(field_error(
            "unlock_too_far",
            "Unlock date cannot be more than 20 years in the future",
        ));
    }
    Ok(())
}

/// Structural checks on a typed content payload; used by the request
/// schemas via `custom(function = ...)`.
pub fn validate_content_data(data: &ContentData) -> Result<(), ValidationError> {
    match data {
        ContentData::Text(text) => {
            if text.text.is_empty() {
                return Err(field_error("text_required", "Text content is required"));
            }
            if text.text.chars().count() > TEXT_BODY_MAX_LEN {
                return Err(field_error("text_too_long", "Text content too long"));
            }
            Ok(())
        }
        ContentData::Image(media) | ContentData::Video(media) | ContentData::Audio(media) => {
            validate_media_fields(&media.url, &media.file_name, media.file_size, &media.mime_type)?;
            validate_metadata(media.metadata.as_ref())
        }
        ContentData::Document(doc) => {
            validate_media_fields(&doc.url, &doc.file_name, doc.file_size, &doc.mime_type)?;
            validate_metadata(doc.metadata.as_ref())?;
            if doc.page_count == Some(0) {
                return Err(field_error("page_count_zero", "Page count must be positive"));
            }
            Ok(())
        }
    }
}

fn validate_metadata(
    metadata: Option<&crate::models::content::ContentMetadata>,
) -> Result<(), ValidationError> {
    let Some(metadata) = metadata else {
        return Ok(());
    };
    if let Some(dims) = &metadata.dimensions {
        if dims.width == 0 || dims.height == 0 {
            return Err(field_error(
                "dimensions_zero",
                "Dimensions must be positive",
            ));
        }
    }
    if let Some(description) = &metadata.description {
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(field_error(
                "metadata_description_too_long",
                "Description cannot exceed 500 characters",
            ));
        }
    }
    Ok(())
}

fn validate_media_fields(
    url: &str,
    file_name: &str,
    file_size: u64,
    mime_type: &str,
) -> Result<(), ValidationError> {
    validate_url_field(url)?;
    if file_name.is_empty() {
        return Err(field_error("file_name_required", "File name is required"));
    }
    if file_name.chars().count() > FILE_NAME_MAX_LEN {
        return Err(field_error("file_name_too_long", "File name too long"));
    }
    if file_size == 0 {
        return Err(field_error("file_size_zero", "File size must be positive"));
    }
    validate_mime_type(mime_type)
}

// Boolean convenience wrappers for callers that only need pass/fail.

pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}

pub fn is_valid_url(url: &str) -> bool {
    validate_url_field(url).is_ok()
}

pub fn is_valid_mime_type(mime_type: &str) -> bool {
    validate_mime_type(mime_type).is_ok()
}

pub fn is_valid_file_size(size: u64, max: u64) -> bool {
    validate_file_size(size, max).is_ok()
}

/// Splits raw comma-separated tag input the way the form does: trimmed,
/// empties dropped, nothing else normalized.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}
