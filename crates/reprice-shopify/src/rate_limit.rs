//! Write throttling for the Admin API.
//!
//! The Admin REST API allows roughly two requests per second per store.
//! Price writes are the bulk of the traffic, so every successful write is
//! followed by a fixed pause. There is no retry or backoff: a rejected write
//! is reported and the run moves on.

use std::time::Duration;

/// Default pause after each successful write (≈1.67 writes/s).
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(600);

/// Fixed post-write pause.
#[derive(Debug, Clone, Copy)]
pub struct WriteThrottle {
    delay: Duration,
}

impl Default for WriteThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_WRITE_DELAY)
    }
}

impl WriteThrottle {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured interval. A zero interval returns at once.
    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay = ?self.delay, "throttling after write");
        tokio::time::sleep(self.delay).await;
    }
}
