//! Bounded polling for long-running remote operations.
//!
//! A submitted job's completion time is unknown in advance, so the
//! poller re-queries its status at a fixed interval until the job
//! reports completion, reports an error payload, or a wall-clock
//! ceiling elapses. Each iteration suspends on `tokio::time::sleep` —
//! waiting yields the executor, it never spins — so any number of
//! campaign runs can poll concurrently on a small worker pool.

use std::future::Future;
use std::time::Duration;

use reelgen_core::provider::{JobPoll, JobResult, ProviderError};
use tokio::time::Instant;

use crate::error::PipelineError;

/// Tunable parameters for one stage's polling behaviour.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Fixed delay between status queries.
    pub interval: Duration,
    /// Wall-clock ceiling for the whole wait.
    pub timeout: Duration,
}

impl PollerConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Default for the video-synthesis stage: query every 10 seconds,
    /// give up after 8 minutes.
    pub fn video_stage() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(480))
    }
}

/// Drive a remote operation to completion or timeout.
///
/// `poll_fn` is invoked once per iteration and returns the provider's
/// view of the job. Outcomes:
/// - completion with a result: `Ok(result)`;
/// - completion with an error payload: the payload as a fatal
///   [`ProviderError`] (the job is finished; resubmission is the
///   enclosing retry policy's decision, not ours);
/// - completion with neither: an `EmptyResult` provider error, which
///   the backoff policy classifies as retryable;
/// - ceiling elapsed: [`PipelineError::OperationTimeout`].
pub async fn poll_until_done<F, Fut>(
    config: PollerConfig,
    mut poll_fn: F,
) -> Result<JobResult, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobPoll, ProviderError>>,
{
    let started = Instant::now();

    loop {
        let status = poll_fn().await?;

        if status.done {
            if let Some(message) = status.error {
                return Err(ProviderError::fatal(message).into());
            }
            return match status.result {
                Some(result) => Ok(result),
                None => Err(ProviderError::empty_result(
                    "operation completed with no generated videos",
                )
                .into()),
            };
        }

        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            return Err(PipelineError::OperationTimeout { elapsed });
        }

        tokio::time::sleep(config.interval).await;
    }
}
