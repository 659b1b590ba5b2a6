//! Retry policy for caption generation.
//!
//! Only a gateway timeout (504) from the caption endpoint is retried, after a
//! fixed delay. Everything else fails the step on the first attempt.

use crate::error::PipelineError;
use std::time::Duration;

/// HTTP 504 Gateway Timeout.
pub const GATEWAY_TIMEOUT: u16 = 504;

/// Determine whether a caption-step error is worth another attempt.
pub fn is_retryable(error: &PipelineError) -> bool {
    error.status_code() == Some(GATEWAY_TIMEOUT)
}

/// Delay before the next attempt. Fixed, not exponential.
pub fn retry_delay(delay_ms: u64) -> Duration {
    Duration::from_millis(delay_ms)
}
