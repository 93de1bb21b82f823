// src/core/services/mod.rs
pub mod capsule_service;
pub mod content_service;
pub mod notification_service;
pub mod user_service;
