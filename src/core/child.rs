//! # ChildRecord: bookkeeping for one supervision slot.
//!
//! A record lives for the whole run. Its `id` never changes; `pid` is `Some` exactly while
//! a process spawned for this slot has not been reaped.

use std::time::Duration;

use nix::unistd::Pid;
use tokio::time::Instant;

/// State of one child slot.
#[derive(Clone, Debug)]
pub struct ChildRecord {
    id: usize,
    pub(crate) pid: Option<Pid>,
    pub(crate) tries: u32,
    pub(crate) last_spawn: Option<Instant>,
}

impl ChildRecord {
    /// Creates an idle record for slot `id`.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            pid: None,
            tries: 0,
            last_spawn: None,
        }
    }

    /// Stable slot index.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current process id, if a child is running in this slot.
    #[inline]
    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    /// Spawn attempts made in the current failure streak.
    #[inline]
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// True while the slot holds a live process.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.pid.is_some()
    }

    /// Time since the last spawn, zero if the slot never spawned.
    pub fn uptime(&self, now: Instant) -> Duration {
        self.last_spawn
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default()
    }
}
