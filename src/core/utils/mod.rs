// src/core/utils/mod.rs
pub mod crypto;
pub mod retry;
pub mod time;
