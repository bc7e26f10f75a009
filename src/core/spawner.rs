//! # Spawner: one spawn attempt for one slot.
//!
//! ```text
//! spawn(slot)
//!   ├─► prior = tries; tries += 1
//!   ├─► !retry.allows(prior) ─► RetriesExhausted, slot stays idle for the run
//!   └─► procs.spawn(slot)
//!         ├─ Ok(pid)  ─► pid, last_spawn = now, running += 1, ChildSpawned
//!         └─ Err(e)   ─► SpawnFailed
//!                        └─ running == 0 ─► FatalNoChildren, fatal = NoChildRunning
//! ```
//!
//! A failed fork is not retried: the slot stays down unless its previous child was the
//! last one running, in which case the whole supervisor stops.

use tokio::time::Instant;

use crate::error::RuntimeError;
use crate::events::{Event, EventKind};

use super::{ProcessControl, Supervisor};

impl<P: ProcessControl> Supervisor<P> {
    /// Attempts to start a process for `slot`, honoring the retry ceiling.
    pub(crate) fn spawn(&mut self, slot: usize) {
        let child = &mut self.children[slot];
        let prior = child.tries;
        child.tries = child.tries.saturating_add(1);

        if !self.cfg.retry.allows(prior) {
            self.bus.publish(
                Event::new(EventKind::RetriesExhausted)
                    .with_slot(slot)
                    .with_attempt(prior),
            );
            return;
        }

        match self.procs.spawn(slot) {
            Ok(pid) => {
                child.pid = Some(pid);
                child.last_spawn = Some(Instant::now());
                self.running += 1;
                self.bus.publish(
                    Event::new(EventKind::ChildSpawned)
                        .with_slot(slot)
                        .with_pid(pid.as_raw())
                        .with_attempt(child.tries),
                );
            }
            Err(errno) => {
                self.bus.publish(
                    Event::new(EventKind::SpawnFailed)
                        .with_slot(slot)
                        .with_reason(errno.desc()),
                );
                if self.running == 0 {
                    self.bus.publish(
                        Event::new(EventKind::FatalNoChildren)
                            .with_slot(slot)
                            .with_reason(errno.desc()),
                    );
                    self.fatal = Some(RuntimeError::NoChildRunning {
                        slot,
                        source: errno,
                    });
                }
            }
        }
    }
}
