//! Scripted process control and helpers for core tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use nix::errno::Errno;
use nix::unistd::Pid;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::events::{Bus, Event, EventKind};
use crate::policies::RetryPolicy;
use crate::signals::SignalName;

use super::{ChildStatus, Flow, ProcessControl, Supervisor, SupervisorEvent};

/// Records every call; spawn outcomes follow `script`, then succeed.
#[derive(Default)]
pub(crate) struct FakeProcs {
    next_pid: i32,
    pub attempts: usize,
    pub script: VecDeque<Result<(), Errno>>,
    pub spawned: Vec<(usize, Pid)>,
    pub killed: Vec<(Pid, SignalName)>,
    pub exited: HashMap<Pid, ChildStatus>,
    pub lost: HashSet<Pid>,
    pub unkillable: HashSet<Pid>,
}

impl FakeProcs {
    /// Signals delivered to children, in order.
    pub fn signals(&self) -> Vec<SignalName> {
        self.killed.iter().map(|(_, sig)| *sig).collect()
    }

    /// Number of successful spawns for `slot`.
    pub fn spawns_of(&self, slot: usize) -> usize {
        self.spawned.iter().filter(|(s, _)| *s == slot).count()
    }
}

impl ProcessControl for FakeProcs {
    fn spawn(&mut self, slot: usize) -> Result<Pid, Errno> {
        self.attempts += 1;
        self.script.pop_front().unwrap_or(Ok(()))?;
        self.next_pid += 1;
        let pid = Pid::from_raw(1000 + self.next_pid);
        self.spawned.push((slot, pid));
        Ok(pid)
    }

    fn kill(&mut self, pid: Pid, sig: SignalName) -> Result<(), Errno> {
        if self.unkillable.contains(&pid) {
            return Err(Errno::ESRCH);
        }
        self.killed.push((pid, sig));
        Ok(())
    }

    fn try_wait(&mut self, pid: Pid) -> Result<Option<ChildStatus>, Errno> {
        if self.lost.contains(&pid) {
            return Err(Errno::ECHILD);
        }
        Ok(self.exited.get(&pid).copied())
    }
}

impl Supervisor<FakeProcs> {
    pub(crate) fn with_procs(mut self, procs: FakeProcs) -> Self {
        self.procs = procs;
        self
    }
}

/// Supervisor over [`FakeProcs`] with no subscribers.
pub(crate) fn supervisor(
    forks: usize,
    max_retries: u32,
    reset_after_ms: u64,
    graceful: Option<SignalName>,
) -> Supervisor<FakeProcs> {
    let mut cfg = Config::new(["/bin/true"]);
    cfg.forks = forks;
    cfg.retry = RetryPolicy {
        max_retries,
        reset_after: Duration::from_millis(reset_after_ms),
    };
    cfg.graceful = graceful;
    Supervisor::new_internal(cfg, FakeProcs::default(), Bus::new(256))
}

/// Reports the current child of `slot` as exited with status 1, without advancing time.
pub(crate) fn exit_fast(sup: &mut Supervisor<FakeProcs>, slot: usize) -> Flow {
    let pid = sup.children()[slot]
        .pid()
        .expect("slot has no running child");
    sup.dispatch(SupervisorEvent::ChildExited {
        slot,
        pid,
        status: ChildStatus::Exited(1),
    })
}

/// Drains the kinds of all events published so far.
pub(crate) fn kinds(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev.kind);
    }
    out
}
