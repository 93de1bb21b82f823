// src/core/utils/retry.rs
use std::collections::HashMap;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 1_000;
const MAX_DELAY_MS: u64 = 10_000;

/// Tracks retry attempts per named operation for one component.
///
/// Owned by whatever issues retryable provider calls and scoped to that
/// component's lifetime; there is deliberately no process-wide instance.
#[derive(Debug, Default)]
pub struct RetryTracker {
    attempts: HashMap<String, u32>,
}

impl RetryTracker {
    pub fn new() -> Self {
        RetryTracker::default()
    }

    pub fn attempts(&self, operation: &str) -> u32 {
        self.attempts.get(operation).copied().unwrap_or(0)
    }

    /// Whether another attempt is allowed for this operation.
    pub fn can_retry(&self, operation: &str) -> bool {
        self.attempts(operation) < MAX_RETRIES
    }

    /// Records a failed attempt and returns the new attempt count.
    pub fn record_failure(&mut self, operation: &str) -> u32 {
        let count = self.attempts.entry(operation.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Clears the counter after a success (or a user-driven reset).
    pub fn reset(&mut self, operation: &str) {
        self.attempts.remove(operation);
    }

    /// Exponential backoff: `1s * 2^attempts`, capped at 10s.
    pub fn delay(&self, operation: &str) -> Duration {
        let attempts = self.attempts(operation).min(30);
        let delay_ms = BASE_DELAY_MS.saturating_mul(1u64 << attempts);
        Duration::from_millis(delay_ms.min(MAX_DELAY_MS))
    }
}
