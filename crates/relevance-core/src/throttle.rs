//! Rate limiting between oracle calls.
//!
//! The batch runner calls [`RateLimiter::wait`] between consecutive rows and
//! never inspects which implementation it holds, so a stricter strategy can be
//! swapped in without touching the runner.

use std::time::Duration;

use async_trait::async_trait;

/// Paces successive oracle calls.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Block until the next call may be issued.
    async fn wait(&self);
}

/// Sleeps a fixed interval regardless of how long the previous call took.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    /// Delay used when nothing else is configured.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(20);

    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[async_trait]
impl RateLimiter for FixedInterval {
    async fn wait(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn wait(&self) {}
}
