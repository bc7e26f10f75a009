//! # Runtime events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Child lifecycle events**: spawn, exit, respawn decisions, retry exhaustion
//! - **Signal events**: shutdown requests and relays to children
//! - **Terminal events**: fatal spawn failure, supervisor stopped
//!
//! The [`Event`] struct carries additional metadata such as timestamps, slot, pid,
//! exit status and signals.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! The supervisor publishes from a single control flow, so `seq` order is processing order.
//!
//! ## Example
//! ```rust
//! use forkwatch::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ChildSpawned)
//!     .with_slot(2)
//!     .with_pid(4242)
//!     .with_attempt(1);
//!
//! assert_eq!(ev.kind, EventKind::ChildSpawned);
//! assert_eq!(ev.slot, Some(2));
//! assert_eq!(ev.pid, Some(4242));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::core::ChildStatus;
use crate::signals::SignalName;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Child lifecycle events ===
    /// A child process was created for a slot.
    ///
    /// Sets:
    /// - `slot`, `pid`
    /// - `attempt`: attempt number within the current failure streak (1-based)
    ChildSpawned,

    /// Fork failed for a slot; the slot stays down.
    ///
    /// Sets:
    /// - `slot`
    /// - `reason`: OS error description
    SpawnFailed,

    /// Slot ran out of attempts and will not be spawned again.
    ///
    /// Sets:
    /// - `slot`
    /// - `attempt`: attempts already made in the streak
    RetriesExhausted,

    /// A child exited (or was killed).
    ///
    /// Sets:
    /// - `slot`, `pid`, `status`
    /// - `uptime_ms`: time since the spawn of this child
    ChildExited,

    /// A child could no longer be waited on and is treated as exited.
    ///
    /// Sets:
    /// - `slot`, `pid`
    /// - `reason`: OS error description
    ChildLost,

    /// A child lived past the reset window; its streak is reset before respawning.
    ///
    /// Sets:
    /// - `slot`
    /// - `uptime_ms`
    ChildRespawning,

    /// A child died inside the reset window; the respawn counts against the streak.
    ///
    /// Sets:
    /// - `slot`
    /// - `attempt`: attempts already made in the streak
    /// - `uptime_ms`
    SpawnRetrying,

    // === Signal events ===
    /// First terminate-class signal observed; no further spawns happen.
    ///
    /// Sets:
    /// - `signal`: the received signal
    ShutdownRequested,

    /// A signal was relayed to all live children.
    ///
    /// Sets:
    /// - `signal`: the received signal
    /// - `delivered`: the signal actually sent
    /// - `count`: number of children signalled
    SignalForwarded,

    /// Sending a signal to one child failed.
    ///
    /// Sets:
    /// - `slot`, `pid`
    /// - `delivered`: the signal that could not be sent
    /// - `reason`: OS error description
    SignalFailed,

    // === Terminal events ===
    /// Fork failed while no child was running; the supervisor stops.
    ///
    /// Sets:
    /// - `slot`
    /// - `reason`: OS error description
    FatalNoChildren,

    /// Supervisor loop ended.
    ///
    /// Sets:
    /// - `reason`: final return status
    SupervisorStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Child slot index.
    pub slot: Option<usize>,
    /// Child process id.
    pub pid: Option<i32>,
    /// Attempt count within the current failure streak.
    pub attempt: Option<u32>,
    /// Exit status of a child.
    pub status: Option<ChildStatus>,
    /// How long the child ran, in milliseconds.
    pub uptime_ms: Option<u64>,
    /// Signal received by the supervisor.
    pub signal: Option<SignalName>,
    /// Signal sent to the children.
    pub delivered: Option<SignalName>,
    /// Number of children affected.
    pub count: Option<usize>,
    /// Human-readable reason (errors, statuses).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            slot: None,
            pid: None,
            attempt: None,
            status: None,
            uptime_ms: None,
            signal: None,
            delivered: None,
            count: None,
            reason: None,
        }
    }

    /// Attaches a slot index.
    #[inline]
    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Attaches a process id.
    #[inline]
    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a child exit status.
    #[inline]
    pub fn with_status(mut self, status: ChildStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a child uptime (stored as milliseconds).
    #[inline]
    pub fn with_uptime(mut self, d: Duration) -> Self {
        self.uptime_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches the received signal.
    #[inline]
    pub fn with_signal(mut self, sig: SignalName) -> Self {
        self.signal = Some(sig);
        self
    }

    /// Attaches the signal sent to children.
    #[inline]
    pub fn with_delivered(mut self, sig: SignalName) -> Self {
        self.delivered = Some(sig);
        self
    }

    /// Attaches a count of affected children.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ChildSpawned);
        let b = Event::new(EventKind::ChildExited);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_uptime_stored_in_millis() {
        let ev = Event::new(EventKind::ChildExited).with_uptime(Duration::from_secs(2));
        assert_eq!(ev.uptime_ms, Some(2000));
    }
}
