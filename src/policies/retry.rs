//! # Retry policy for child slots.
//!
//! [`RetryPolicy`] decides two things for a slot:
//! - whether another spawn attempt is allowed in the current failure streak;
//! - whether a child that just died had lived long enough to reset the streak.
//!
//! ## Attempt accounting
//! ```text
//! spawn(slot):
//!   prior = tries; tries += 1
//!   prior <= max_retries ? fork : give up (slot stays idle)
//!
//! child died after `elapsed`:
//!   survived(elapsed) ? tries = 0 : keep tries
//!   spawn(slot)
//! ```
//! A streak therefore gets `max_retries + 1` attempts: the first spawn plus `max_retries` retries.
//!
//! ## Zero timeout
//! `reset_after = 0` means every death counts as a fresh failure, so retries are unlimited.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use forkwatch::RetryPolicy;
//!
//! let policy = RetryPolicy { max_retries: 2, reset_after: Duration::from_secs(10) };
//!
//! assert!(policy.allows(0));
//! assert!(policy.allows(2));
//! assert!(!policy.allows(3));
//!
//! assert!(!policy.survived(Duration::from_secs(10)));
//! assert!(policy.survived(Duration::from_millis(10_001)));
//! ```

use std::time::Duration;

/// Bounded retry policy with a streak-reset window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt of a streak (`>= 1`).
    pub max_retries: u32,
    /// A child surviving strictly longer than this resets the streak (`0` = always reset).
    pub reset_after: Duration,
}

impl Default for RetryPolicy {
    /// Returns a policy with:
    /// - `max_retries = 3`;
    /// - `reset_after = 10s`.
    fn default() -> Self {
        Self {
            max_retries: 3,
            reset_after: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Whether a spawn is allowed given the attempts already made in this streak.
    #[inline]
    pub fn allows(&self, prior_attempts: u32) -> bool {
        prior_attempts <= self.max_retries
    }

    /// Whether a child that lived for `elapsed` ends its failure streak.
    #[inline]
    pub fn survived(&self, elapsed: Duration) -> bool {
        self.reset_after.is_zero() || elapsed > self.reset_after
    }
}
