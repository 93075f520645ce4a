use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Paces request starts across every worker sharing the limiter.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    interval: Option<Duration>,
    next_slot: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// rate = requests per second, 0 disables pacing
    pub fn new(rate: u32) -> Self {
        let interval = (rate > 0).then(|| Duration::from_secs_f64(1.0 / rate as f64));

        Self {
            interval,
            next_slot: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// Reserve the next slot and sleep until it. The lock is only held while
    /// reserving, so sleeping workers do not serialize each other.
    pub async fn wait(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = (*next).max(now);
            *next = slot + interval;
            slot
        };

        tokio::time::sleep_until(slot.into()).await;
    }
}
