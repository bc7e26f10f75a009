//! # Exit handler: retry accounting after a child dies.
//!
//! ```text
//! ChildExited { slot, pid, status }
//!   ├─► pid no longer owned by slot ─► ignore (already handled)
//!   ├─► pid = None, running -= 1, ChildExited
//!   ├─► shutdown ─► stop here (expected exit)
//!   ├─► retry.survived(uptime) ? tries = 0, ChildRespawning
//!   │                          : SpawnRetrying (streak continues)
//!   └─► spawn(slot)
//! ```
//!
//! Uptime is measured on the monotonic clock; no timer is armed while a child runs.

use nix::unistd::Pid;
use tokio::time::Instant;

use crate::events::{Event, EventKind};

use super::{ChildStatus, ProcessControl, Supervisor};

impl<P: ProcessControl> Supervisor<P> {
    pub(crate) fn handle_exit(&mut self, slot: usize, pid: Pid, status: ChildStatus) {
        let Some(child) = self.children.get_mut(slot) else {
            return;
        };
        if child.pid != Some(pid) {
            return;
        }

        let uptime = child.uptime(Instant::now());
        child.pid = None;
        self.running -= 1;
        self.bus.publish(
            Event::new(EventKind::ChildExited)
                .with_slot(slot)
                .with_pid(pid.as_raw())
                .with_status(status)
                .with_uptime(uptime),
        );

        if self.shutdown {
            return;
        }

        if self.cfg.retry.survived(uptime) {
            child.tries = 0;
            self.bus.publish(
                Event::new(EventKind::ChildRespawning)
                    .with_slot(slot)
                    .with_uptime(uptime),
            );
        } else {
            self.bus.publish(
                Event::new(EventKind::SpawnRetrying)
                    .with_slot(slot)
                    .with_attempt(child.tries)
                    .with_uptime(uptime),
            );
        }

        self.spawn(slot);
    }
}
