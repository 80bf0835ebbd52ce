//! Rate limiting for NCBI API compliance
//!
//! NCBI E-utilities allow 3 requests per second without an API key and 10 with
//! one; violations can result in IP blocking. All outbound requests go through a
//! single [`RateLimiter`] shared by every clone of the client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument};

/// Spacing for `rate` requests per second, `None` when it cannot be represented
pub(crate) fn interval_for_rate(rate: f64) -> Option<Duration> {
    if !(rate.is_finite() && rate > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / rate).ok()
}

/// Serializes callers so that consecutive grants are at least `min_interval` apart
///
/// The inner mutex is held across the wait. tokio's mutex queues waiters in
/// FIFO order, so concurrent callers are granted strictly one at a time in
/// arrival order.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    last_grant: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter with the given minimum spacing between requests
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_search_mcp::rate_limit::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(Duration::from_millis(340));
    /// assert_eq!(limiter.min_interval(), Duration::from_millis(340));
    /// ```
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_grant: Arc::new(Mutex::new(None)),
            min_interval,
        }
    }

    /// Create a rate limiter from a requests-per-second figure
    ///
    /// A rate with no representable interval (zero, negative, NaN, infinite
    /// or too small) falls back to the NCBI default.
    pub fn per_second(rate: f64) -> Self {
        Self::new(interval_for_rate(rate).unwrap_or(crate::config::NCBI_DEFAULT_INTERVAL))
    }

    /// NCBI limit without an API key
    pub fn ncbi_default() -> Self {
        Self::new(crate::config::NCBI_DEFAULT_INTERVAL)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next outbound request may be issued
    ///
    /// Never fails and never times out; a caller always eventually proceeds.
    ///
    /// ```no_run
    /// use pubmed_search_mcp::rate_limit::RateLimiter;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let limiter = RateLimiter::ncbi_default();
    ///
    ///     limiter.acquire().await;
    ///     // Make API call here
    ///
    ///     limiter.acquire().await;
    ///     // At least 340ms after the first grant
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Instant {
        let mut last_grant = self.last_grant.lock().await;

        if let Some(previous) = *last_grant {
            let next_allowed = previous + self.min_interval;
            if next_allowed > Instant::now() {
                debug!(
                    wait_ms = (next_allowed - Instant::now()).as_millis() as u64,
                    "Waiting for rate limit slot"
                );
                sleep_until(next_allowed).await;
            }
        }

        let granted = Instant::now();
        *last_grant = Some(granted);
        granted
    }
}
