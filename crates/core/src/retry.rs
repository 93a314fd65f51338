//! Per-stage retry/backoff policy for transient provider failures.
//!
//! The policy is a pure function of (error classification, attempt
//! index). It knows nothing about which stage invoked it; each remote
//! call site passes its own parameters. The delay curve is plain
//! exponential — `base_delay * 2^(attempt-1)` — with no jitter and no
//! cap, matching the provider quota windows the stages wait out.

use std::time::Duration;

use crate::provider::ProviderErrorKind;

/// Tunable parameters for one call site's retry behaviour.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total submission attempts, including the first (1-based).
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per attempt after.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Default for the video-synthesis stage (matches the provider's
    /// quota replenishment window).
    pub fn video_stage() -> Self {
        Self::new(4, Duration::from_secs(6))
    }

    /// Default for the narration stage.
    pub fn narration_stage() -> Self {
        Self::new(3, Duration::from_secs(2))
    }

    /// Decide what to do after a failed attempt.
    ///
    /// `attempt` is 1-based: the first failed call passes `1`.
    /// Fatal errors never spend retry budget; retryable errors are
    /// retried until `attempt` reaches `max_attempts`, at which point
    /// the caller surfaces the original error unchanged.
    pub fn decide(&self, kind: ProviderErrorKind, attempt: u32) -> RetryDecision {
        if !kind.is_retryable() || attempt >= self.max_attempts {
            return RetryDecision::Fail;
        }
        RetryDecision::Retry {
            after: self.delay_for(attempt),
        }
    }

    /// Delay before the retry following failed attempt `attempt`.
    fn delay_for(&self, attempt: u32) -> Duration {
        // base * 2^(attempt-1); attempt counts from 1 for the first retry.
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Outcome of consulting the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `after`, then resubmit as a fresh attempt.
    Retry { after: Duration },
    /// Give up; the caller surfaces the original error unchanged.
    Fail,
}
