// src/core/lib.rs

pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validation;

pub use error::CapsuleError;
