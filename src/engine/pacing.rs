//! Randomized pacing between interactive browser actions.
//!
//! The delays exist to keep the browsing pattern human-like and to give
//! the DOM time to settle after a click, not for correctness.

use std::time::Duration;

use rand::Rng;
use tracing::trace;

/// Inclusive delay bounds for one pacing policy.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    /// Build a pacing policy. Bounds are swapped if given in the wrong
    /// order so a pause is always well-defined.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Zero-delay policy for tests and dry runs.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Sleep for a uniformly random duration within the bounds.
    pub async fn pause(&self) {
        let span_ms = (self.max - self.min).as_millis() as u64;
        let jitter = if span_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=span_ms)
        };
        let delay = self.min + Duration::from_millis(jitter);
        if !delay.is_zero() {
            trace!(delay_ms = delay.as_millis() as u64, "pacing pause");
            tokio::time::sleep(delay).await;
        }
    }
}
