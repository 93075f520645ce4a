//! Bounded exponential backoff for collaborator fetches.
//!
//! Probe requests never go through here: a failed probe is terminal.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryStrategy {
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryStrategy {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }

    pub fn none() -> Self {
        Self::new(0)
    }

    pub async fn retry_with_backoff<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(e);
                    }

                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {}ms...",
                        attempt,
                        self.max_retries,
                        e,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(exp));
        delay.min(self.max_delay)
    }
}
