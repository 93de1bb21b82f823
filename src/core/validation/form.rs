// src/core/validation/form.rs
//
// Cross-field validation over a complete form snapshot. Results are always
// returned as data; nothing in here panics on user input.

use crate::utils::time;
use crate::validation::fields::{
    self, FORM_TEXT_MAX_LEN, MAX_FILES, MAX_FORM_FILE_SIZE, MAX_TAGS, TAG_MAX_LEN,
};
use crate::validation::state::CapsuleForm;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field names, in the order they are validated and reported.
pub const FORM_FIELDS: [&str; 7] = [
    "title",
    "description",
    "unlock_date",
    "unlock_time",
    "content.text",
    "content.files",
    "tags",
];

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FormFieldError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl FormFieldError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        FormFieldError {
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        FormFieldError {
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// The partitioned result of one validation pass. `is_valid` is true iff
/// `errors` is empty; warnings never block submission.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormValidationState {
    pub is_valid: bool,
    pub errors: Vec<FormFieldError>,
    pub warnings: Vec<FormFieldError>,
    pub touched: BTreeMap<String, bool>,
}

impl Default for FormValidationState {
    fn default() -> Self {
        FormValidationState {
            is_valid: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            touched: BTreeMap::new(),
        }
    }
}

impl FormValidationState {
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn warning_for(&self, field: &str) -> Option<&str> {
        self.warnings
            .iter()
            .find(|w| w.field == field)
            .map(|w| w.message.as_str())
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn has_warning(&self, field: &str) -> bool {
        self.warnings.iter().any(|w| w.field == field)
    }
}

/// Validates the whole snapshot at the current wall-clock time.
pub fn validate_form_now(form: &CapsuleForm) -> FormValidationState {
    validate_form(form, time::now_utc())
}

/// Validates the whole snapshot against an explicit `now`.
///
/// Runs every field rule in [`FORM_FIELDS`] order, partitions the results
/// into blocking errors and non-blocking warnings, marks fields with values
/// as touched, then applies the one genuinely cross-field rule: the combined
/// unlock date and time must still be strictly in the future at validation
/// time.
pub fn validate_form(form: &CapsuleForm, now: DateTime<Utc>) -> FormValidationState {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut touched = BTreeMap::new();

    for field in FORM_FIELDS {
        if let Some(result) = validate_field(field, form, now) {
            match result.severity {
                Severity::Error => errors.push(result),
                Severity::Warning => warnings.push(result),
            }
        }
        if field_has_value(field, form) {
            touched.insert(field.to_string(), true);
        }
    }

    // Cross-field rule: a date that passed on entry can still be in the past
    // by the time validation re-runs, or an early time of day can pull an
    // otherwise-valid date behind `now`.
    if !form.unlock_date.is_empty() && !form.unlock_time.is_empty() {
        if let Some(unlock_at) = time::parse_date_time(&form.unlock_date, &form.unlock_time) {
            if unlock_at <= now {
                errors.push(FormFieldError::error(
                    "unlock_date",
                    "The selected date and time must be in the future",
                ));
            }
        }
    }

    FormValidationState {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        touched,
    }
}

/// Runs the rule for a single named field against the full snapshot.
/// Returns at most one finding per field, the first rule that fails.
pub fn validate_field(
    field: &str,
    form: &CapsuleForm,
    now: DateTime<Utc>,
) -> Option<FormFieldError> {
    match field {
        "title" => fields::validate_title(&form.title)
            .err()
            .map(|e| FormFieldError::error(field, error_message(&e))),

        "description" => fields::validate_description(&form.description)
            .err()
            .map(|e| FormFieldError::error(field, error_message(&e))),

        "unlock_date" => {
            if form.unlock_date.is_empty() {
                return Some(FormFieldError::error(field, "Unlock date is required"));
            }
            // Validity of the date depends on the time field too. An unset
            // time defaults to midnight, as the form submits it; a malformed
            // time also falls back so the failure is reported once, on
            // `unlock_time`, not as a bogus date error.
            let time = if form.unlock_time.is_empty()
                || fields::validate_time_of_day(&form.unlock_time).is_err()
            {
                "00:00"
            } else {
                form.unlock_time.as_str()
            };
            let Some(unlock_at) = time::parse_date_time(&form.unlock_date, time) else {
                return Some(FormFieldError::error(field, "Please enter a valid date"));
            };
            fields::validate_unlock_window(unlock_at, now)
                .err()
                .map(|e| FormFieldError::error(field, error_message(&e)))
        }

        "unlock_time" => {
            if form.unlock_time.is_empty() {
                return Some(FormFieldError::error(field, "Unlock time is required"));
            }
            fields::validate_time_of_day(&form.unlock_time)
                .err()
                .map(|e| FormFieldError::error(field, error_message(&e)))
        }

        "content.text" => {
            if form.content.text.chars().count() > FORM_TEXT_MAX_LEN {
                return Some(FormFieldError::error(
                    field,
                    "Text content cannot exceed 2000 characters",
                ));
            }
            None
        }

        "content.files" => {
            if form.content.files.len() > MAX_FILES {
                return Some(FormFieldError::error(
                    field,
                    "You can upload a maximum of 10 files",
                ));
            }
            for file in &form.content.files {
                if file.size > MAX_FORM_FILE_SIZE {
                    return Some(FormFieldError::error(
                        field,
                        format!("File \"{}\" is too large (max 10MB)", file.name),
                    ));
                }
            }
            None
        }

        // Tag problems never block submission; the list is reported as
        // entered, not truncated.
        "tags" => {
            let tags = fields::parse_tags(&form.tags);
            if tags.len() > MAX_TAGS {
                return Some(FormFieldError::warning(
                    field,
                    "You can add a maximum of 10 tags",
                ));
            }
            if tags.iter().any(|tag| tag.chars().count() > TAG_MAX_LEN) {
                return Some(FormFieldError::warning(
                    field,
                    "Each tag cannot exceed 20 characters",
                ));
            }
            None
        }

        _ => None,
    }
}

fn field_has_value(field: &str, form: &CapsuleForm) -> bool {
    match field {
        "title" => !form.title.is_empty(),
        "description" => !form.description.is_empty(),
        "unlock_date" => !form.unlock_date.is_empty(),
        "unlock_time" => !form.unlock_time.is_empty(),
        "content.text" => !form.content.text.is_empty(),
        "content.files" => !form.content.files.is_empty(),
        "tags" => !form.tags.is_empty(),
        _ => false,
    }
}

fn error_message(error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string())
}
