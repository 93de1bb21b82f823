// src/core/error.rs
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Serialize, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum CapsuleError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Capsule not found: {0}")]
    CapsuleNotFound(String),

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Capsule is sealed")]
    CapsuleSealed,

    #[error("Capsule is still locked")]
    CapsuleLocked,

    #[error("Capsule limit reached for user")]
    CapsuleLimitReached,

    #[error("Content limit reached for capsule")]
    ContentLimitReached,

    #[error("File of {size} bytes exceeds the maximum of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File type is not allowed: {0}")]
    FileTypeNotAllowed(String),

    #[error("System is in maintenance mode")]
    MaintenanceMode,

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Rough grouping of external provider failures, used to pick a retry delay.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Network,
    Validation,
    Auth,
    Provider,
    Unknown,
}

impl ErrorCategory {
    /// Suggested delay before retrying an operation that failed in this category.
    pub fn suggested_retry_delay(&self) -> Duration {
        match self {
            ErrorCategory::Network => Duration::from_millis(2000),
            ErrorCategory::Auth => Duration::from_millis(1000),
            ErrorCategory::Provider => Duration::from_millis(3000),
            ErrorCategory::Validation | ErrorCategory::Unknown => Duration::from_millis(1500),
        }
    }
}

/// A failure reported by one of the external providers (auth, database,
/// object storage), mapped to something displayable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalError {
    pub code: String,
    pub message: String,
    pub user_message: String,
    pub retryable: bool,
    pub category: ErrorCategory,
}

impl ExternalError {
    fn new(
        code: &str,
        message: &str,
        user_message: &str,
        retryable: bool,
        category: ErrorCategory,
    ) -> Self {
        ExternalError {
            code: code.to_string(),
            message: message.to_string(),
            user_message: user_message.to_string(),
            retryable,
            category,
        }
    }

    pub fn suggested_retry_delay(&self) -> Duration {
        self.category.suggested_retry_delay()
    }
}

/// Maps a provider error code to a displayable [`ExternalError`].
///
/// Unknown codes fall back to a generic, retryable entry so the caller can
/// always show something and offer a retry.
pub fn map_error_code(code: &str) -> ExternalError {
    use ErrorCategory::*;

    match code {
        // Network errors
        "auth/network-request-failed" => ExternalError::new(
            code,
            "Network request failed",
            "Please check your internet connection and try again.",
            true,
            Network,
        ),
        "auth/timeout" => ExternalError::new(
            code,
            "Request timeout",
            "The request took too long. Please try again.",
            true,
            Network,
        ),

        // Authentication errors
        "auth/user-not-found" => ExternalError::new(
            code,
            "User not found",
            "No account found with this email address.",
            false,
            Auth,
        ),
        "auth/wrong-password" => ExternalError::new(
            code,
            "Wrong password",
            "Incorrect password. Please try again.",
            false,
            Auth,
        ),
        "auth/invalid-email" => ExternalError::new(
            code,
            "Invalid email",
            "Please enter a valid email address.",
            false,
            Validation,
        ),
        "auth/user-disabled" => ExternalError::new(
            code,
            "User disabled",
            "This account has been disabled. Please contact support.",
            false,
            Auth,
        ),
        "auth/email-already-in-use" => ExternalError::new(
            code,
            "Email already in use",
            "An account with this email already exists.",
            false,
            Auth,
        ),
        "auth/weak-password" => ExternalError::new(
            code,
            "Weak password",
            "Password should be at least 6 characters long.",
            false,
            Validation,
        ),
        "auth/operation-not-allowed" => ExternalError::new(
            code,
            "Operation not allowed",
            "Email/password accounts are not enabled.",
            false,
            Provider,
        ),

        // Provider configuration errors
        "auth/configuration-not-found" => ExternalError::new(
            code,
            "Configuration not found",
            "Provider configuration error. Please refresh the page or contact support.",
            true,
            Provider,
        ),
        "auth/invalid-api-key" => ExternalError::new(
            code,
            "Invalid API key",
            "Configuration error. Please refresh the page.",
            true,
            Provider,
        ),

        // Rate limiting
        "auth/too-many-requests" => ExternalError::new(
            code,
            "Too many requests",
            "Too many attempts. Please wait a moment before trying again.",
            true,
            Auth,
        ),

        // Popup flow errors
        "auth/popup-closed-by-user" => ExternalError::new(
            code,
            "Popup closed by user",
            "Sign-in popup was closed. Please try again.",
            false,
            Auth,
        ),
        "auth/popup-blocked" => ExternalError::new(
            code,
            "Popup blocked",
            "Popup was blocked by your browser. Please allow popups and try again.",
            false,
            Auth,
        ),
        "auth/cancelled-popup-request" => ExternalError::new(
            code,
            "Popup request cancelled",
            "Sign-in was cancelled. Please try again.",
            false,
            Auth,
        ),

        _ => ExternalError::new(
            code,
            "Unknown error occurred",
            "An unexpected error occurred. Please try again.",
            true,
            Unknown,
        ),
    }
}

/// Convenience check used by retry-capable call sites.
pub fn is_retryable(code: &str) -> bool {
    map_error_code(code).retryable
}
