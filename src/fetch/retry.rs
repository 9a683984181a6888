use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::{ResearchError, ResearchResult};

/// Explicit retry policy for the fetcher boundary.
///
/// Exponential backoff with optional jitter. Applied only around network
/// operations; the extraction and scoring core never retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, jitter: bool) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay, jitter }
    }

    /// Backoff before the given retry (1-based attempt that just failed):
    /// base * 2^(attempt-1), plus up to 250ms of jitter.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        let mut delay = self.base_delay * 2u32.saturating_pow(exponent);

        if self.jitter {
            let jitter_ms = rand::thread_rng().gen_range(0..250);
            delay += Duration::from_millis(jitter_ms);
        }

        delay
    }

    /// Run an operation with retries. Only recoverable errors are retried;
    /// configuration and credential errors surface immediately.
    pub async fn run<T, F, Fut>(&self, operation: F) -> ResearchResult<T>
    where
        F: Fn(usize) -> Fut,
        Fut: Future<Output = ResearchResult<T>>,
    {
        let mut last_error: Option<ResearchError> = None;

        for attempt in 1..=self.max_attempts {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_recoverable() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after recoverable error"
                    );
                    last_error = Some(e);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ResearchError::internal("retry loop exhausted")))
    }
}
