use std::time::Duration;

use crate::constants::{
    LOOP_BUDGET_MS, LOOP_POLL_INTERVAL_MS, LOOP_READ_CHUNK, LOOP_SETTLE_MS, WAKE_ATTEMPT_TIMEOUT_MS,
    WAKE_ATTEMPTS, WAKE_POLL_INTERVAL_MS, WAKE_RETRY_DELAY_MS,
};

/// Bounded retry: `max_attempts` tries, each with its own wall-clock deadline,
/// separated by `retry_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
    /// Sleep between empty reads inside one attempt
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    /// Console wake-up: 3 attempts of 1 s, 0.5 s apart
    fn default() -> Self {
        RetryPolicy {
            max_attempts: WAKE_ATTEMPTS,
            attempt_timeout: Duration::from_millis(WAKE_ATTEMPT_TIMEOUT_MS),
            retry_delay: Duration::from_millis(WAKE_RETRY_DELAY_MS),
            poll_interval: Duration::from_millis(WAKE_POLL_INTERVAL_MS),
        }
    }
}

/// Timing of one request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquirePolicy {
    /// Dead time between sending the command and the first read
    pub settle: Duration,
    /// Wall-clock budget for collecting the frame
    pub budget: Duration,
    pub poll_interval: Duration,
    /// Maximum bytes requested per read
    pub read_chunk: usize,
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        AcquirePolicy {
            settle: Duration::from_millis(LOOP_SETTLE_MS),
            budget: Duration::from_millis(LOOP_BUDGET_MS),
            poll_interval: Duration::from_millis(LOOP_POLL_INTERVAL_MS),
            read_chunk: LOOP_READ_CHUNK,
        }
    }
}
