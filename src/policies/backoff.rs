//! # Backoff policy for reconnect attempts.
//!
//! [`BackoffPolicy`] controls how the delay between reconnect attempts grows
//! while the store stays unreachable. It is parameterized by:
//! - [`BackoffPolicy::first`] the initial (and minimum) delay;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for attempt `n` is computed as `first × factor^n`, clamped to
//! `max`, then jitter is applied and the result is floored at `first`. The
//! base derives purely from the attempt number, so jitter output never feeds
//! back into subsequent calculations, and the floor preserves the contract
//! that reconnects are never issued more frequently than `first` apart.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use relisten::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_secs(10),
//!     max: Duration::from_secs(60),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! // Attempt 0 — uses 'first' (10s)
//! assert_eq!(backoff.next(0), Duration::from_secs(10));
//!
//! // Attempt 1 — first × factor^1 = 20s
//! assert_eq!(backoff.next(1), Duration::from_secs(20));
//!
//! // Attempt 10 — 10s × 2^10 → capped at max=60s
//! assert_eq!(backoff.next(10), Duration::from_secs(60));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Reconnect backoff policy.
///
/// Encapsulates the schedule governing retry delays after connection loss:
/// - [`BackoffPolicy::first`] — initial delay, also the hard minimum;
/// - [`BackoffPolicy::factor`] — multiplicative growth factor;
/// - [`BackoffPolicy::max`] — the maximum delay cap.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Initial delay after the first failed reconnect attempt. Also the
    /// minimum interval between attempts (jitter never undercuts it).
    pub first: Duration,
    /// Maximum delay cap between attempts.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy to de-synchronize retries across processes.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a schedule with:
    /// - `first = 10s`;
    /// - `max = 60s`;
    /// - `factor = 2.0` (doubling);
    /// - no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(10),
            max: Duration::from_secs(60),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay before retry number `attempt` (0-indexed).
    ///
    /// The base delay is `first × factor^attempt`, clamped to
    /// [`BackoffPolicy::max`]. Jitter is applied to the clamped base and the
    /// final result is floored at `min(first, max)`.
    ///
    /// # Notes
    /// - `factor == 1.0` keeps the delay constant at `first` (up to `max`).
    /// - `factor > 1.0` grows the delay toward `max`.
    /// - Overflowing or non-finite intermediate values clamp to `max`.
    pub fn next(&self, attempt: u32) -> Duration {
        let floor = self.first.min(self.max);
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        self.jitter.apply(base).max(floor)
    }
}
