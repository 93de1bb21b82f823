// src/core/validation/state.rs
use crate::error::CapsuleError;
use crate::utils::time;
use crate::validation::form::{self, FormValidationState};

/// A file the user has attached to the form, before any upload happens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentForm {
    pub text: String,
    pub files: Vec<FileEntry>,
}

/// The complete create-capsule form snapshot: every value exactly as the
/// user entered it. Dates and tags stay raw strings until validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapsuleForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub unlock_date: String,
    /// `HH:MM`
    pub unlock_time: String,
    /// Raw comma-separated tag input.
    pub tags: String,
    pub content: ContentForm,
}

/// A value written into the form at some dot-path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Files(Vec<FileEntry>),
}

/// Owns the mutable form snapshot and the last validation result. Every
/// mutation synchronously re-runs the full cross-field validation; nothing
/// here suspends or shares state across threads.
#[derive(Debug)]
pub struct FormState {
    initial: CapsuleForm,
    form: CapsuleForm,
    result: FormValidationState,
}

impl FormState {
    pub fn new(initial: CapsuleForm) -> Self {
        FormState {
            form: initial.clone(),
            initial,
            result: FormValidationState::default(),
        }
    }

    pub fn form(&self) -> &CapsuleForm {
        &self.form
    }

    pub fn result(&self) -> &FormValidationState {
        &self.result
    }

    /// Writes `value` at the (possibly nested) dot-path, then re-validates
    /// the whole snapshot. Paths are matched explicitly; an unknown path or
    /// a value of the wrong shape is rejected without touching the form.
    pub fn update_field(&mut self, path: &str, value: FieldValue) -> Result<(), CapsuleError> {
        let mut parts = path.splitn(2, '.');
        let head = parts.next().unwrap_or_default();
        let rest = parts.next();

        match (head, rest, value) {
            ("title", None, FieldValue::Text(text)) => self.form.title = text,
            ("description", None, FieldValue::Text(text)) => self.form.description = text,
            ("unlock_date", None, FieldValue::Text(text)) => self.form.unlock_date = text,
            ("unlock_time", None, FieldValue::Text(text)) => self.form.unlock_time = text,
            ("tags", None, FieldValue::Text(text)) => self.form.tags = text,
            ("content", Some("text"), FieldValue::Text(text)) => self.form.content.text = text,
            ("content", Some("files"), FieldValue::Files(files)) => {
                self.form.content.files = files
            }
            (_, _, value) => {
                return Err(CapsuleError::InvalidInput(format!(
                    "no form field at path '{path}' accepting {}",
                    match value {
                        FieldValue::Text(_) => "text",
                        FieldValue::Files(_) => "files",
                    }
                )))
            }
        }

        self.revalidate();
        Ok(())
    }

    /// Adds a file to the tracked list and re-validates.
    pub fn add_file(&mut self, file: FileEntry) {
        self.form.content.files.push(file);
        self.revalidate();
    }

    /// Removes a file by name and re-validates, so the file count is
    /// immediately re-checked against the maximum. Returns whether anything
    /// was removed.
    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.form.content.files.len();
        self.form.content.files.retain(|file| file.name != name);
        let removed = self.form.content.files.len() != before;
        if removed {
            self.revalidate();
        }
        removed
    }

    /// Forces a re-run over the current snapshot (used on submit).
    pub fn validate(&mut self) -> FormValidationState {
        self.revalidate();
        self.result.clone()
    }

    /// Restores the initial snapshot and clears the validation result.
    pub fn reset(&mut self) {
        self.form = self.initial.clone();
        self.result = FormValidationState::default();
    }

    fn revalidate(&mut self) {
        self.result = form::validate_form(&self.form, time::now_utc());
    }
}
