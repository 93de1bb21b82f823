// src/core/models/system.rs
use serde::{Deserialize, Serialize};

/// Singleton configuration document stored in the `system` collection.
/// Gates what the content and capsule services accept.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    pub maintenance_mode: bool,
    /// Upper bound for any single uploaded file, in bytes.
    pub max_file_size: u64,
    pub allowed_file_types: Vec<String>,
    pub max_capsules_per_user: u32,
    pub max_content_per_capsule: u32,
    pub version: String,
}

impl SystemConfig {
    pub fn is_file_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_file_types.iter().any(|t| t == mime_type)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            maintenance_mode: false,
            max_file_size: 10 * 1024 * 1024,
            allowed_file_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
                "video/mp4".to_string(),
                "video/webm".to_string(),
                "audio/mpeg".to_string(),
                "audio/wav".to_string(),
                "application/pdf".to_string(),
                "text/plain".to_string(),
            ],
            max_capsules_per_user: 50,
            max_content_per_capsule: 100,
            version: "1.0.0".to_string(),
        }
    }
}
