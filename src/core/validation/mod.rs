// src/core/validation/mod.rs
pub mod fields;
pub mod form;
pub mod state;

pub use form::{FormFieldError, FormValidationState, Severity};
pub use state::{CapsuleForm, ContentForm, FieldValue, FileEntry, FormState};
