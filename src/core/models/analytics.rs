// src/core/models/analytics.rs
use crate::models::common::{CapsuleId, Timestamp};
use serde::{Deserialize, Serialize};

/// Per-capsule analytics record, keyed by capsule id. No lifecycle of its
/// own beyond the parent capsule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleAnalytics {
    pub capsule_id: CapsuleId,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub open_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<Timestamp>,
    /// Average viewing time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_view_duration: Option<f64>,
}

impl CapsuleAnalytics {
    pub fn new(capsule_id: impl Into<CapsuleId>) -> Self {
        CapsuleAnalytics {
            capsule_id: capsule_id.into(),
            view_count: 0,
            share_count: 0,
            open_count: 0,
            last_viewed: None,
            average_view_duration: None,
        }
    }
}
