//! Retry policies.
//!
//! This module groups the knobs that control **whether** a dead child slot is spawned again.
//!
//! ## Contents
//! - [`RetryPolicy`] attempt ceiling per failure streak and the streak-reset window
//!
//! ## Quick wiring
//! ```text
//! Config { retry: RetryPolicy, .. }
//!      └─► core spawner uses retry.allows(prior_attempts) before forking
//!      └─► core exit handler uses retry.survived(uptime) to reset the streak
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → max_retries=3, reset_after=10s.

mod retry;

pub use retry::RetryPolicy;
