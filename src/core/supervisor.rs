//! # Supervisor: owns the child slots and runs the event loop.
//!
//! The [`Supervisor`] owns every [`ChildRecord`], the signal router and the event bus that
//! feeds the subscribers. All of its state is mutated from one control flow: events are taken
//! one at a time from the OS event source and handed to [`Supervisor::dispatch`].
//!
//! ## Key responsibilities
//! - spawn all `forks` children once at startup
//! - route child exits to the exit handler (retry accounting, respawn)
//! - route signals to the signal router (relay, graceful shutdown)
//! - stop when no child is left running, or immediately on a fatal spawn failure
//!
//! ## High-level architecture
//! ```text
//! Supervisor::run()
//!   ├─► OsEvents::install()   (HUP INT QUIT TERM USR1 USR2 CHLD, before any fork)
//!   ├─► start(): spawn(slot) for slot in 0..forks
//!   ├─► loop {
//!         OsEvents::next().await
//!           ├─ Signal(name)       ─► dispatch(SignalReceived(name))
//!           └─ ChildStateChanged  ─► reap() ─► dispatch(ChildExited{slot, pid, status}) ...
//!         Flow::Stop ─► break
//!       }
//!   └─► publish(SupervisorStopped), Bus::close() (subscribers drained)
//!
//! State machine:
//!   Initial ──► Starting ──► Running ──► Terminal
//!                   │                       ▲
//!                   └── fatal spawn error ──┘
//! ```
//!
//! Signal listeners never keep the loop alive: once `running` reaches zero the loop ends,
//! whether the slots were drained by shutdown or went idle after exhausting their retries.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use forkwatch::{Config, LogWriter, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::new(["/usr/bin/php-cgi"]);
//!     cfg.forks = 4;
//!
//!     let sup = Supervisor::builder(cfg)
//!         .with_subscribers(vec![Arc::new(LogWriter::new())])
//!         .build()?;
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

use nix::unistd::Pid;

use crate::{
    config::Config,
    error::{RuntimeError, FATAL_SPAWN_STATUS},
    events::{Bus, Event, EventKind},
    signals::{SignalName, SignalRouter},
};

use super::{
    builder::SupervisorBuilder,
    child::ChildRecord,
    process::{ChildStatus, OsProcess, ProcessControl},
    source::{OsEvent, OsEvents},
};

/// Input of the dispatch function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A child process of `slot` ended.
    ChildExited {
        slot: usize,
        pid: Pid,
        status: ChildStatus,
    },
    /// The supervisor received a signal.
    SignalReceived(SignalName),
}

/// Whether the loop keeps waiting for events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Process supervisor for `forks` copies of one program.
pub struct Supervisor<P: ProcessControl = OsProcess> {
    pub(crate) cfg: Config,
    pub(crate) children: Vec<ChildRecord>,
    pub(crate) running: usize,
    pub(crate) shutdown: bool,
    pub(crate) fatal: Option<RuntimeError>,
    pub(crate) router: SignalRouter,
    pub(crate) procs: P,
    pub(crate) bus: Bus,
}

impl Supervisor<OsProcess> {
    /// Starts building a supervisor that forks real processes.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }
}

impl<P: ProcessControl> Supervisor<P> {
    pub(crate) fn new_internal(cfg: Config, procs: P, bus: Bus) -> Self {
        let children = (0..cfg.forks).map(ChildRecord::new).collect();
        let router = SignalRouter::new(cfg.routes.clone(), cfg.graceful);
        Self {
            cfg,
            children,
            running: 0,
            shutdown: false,
            fatal: None,
            router,
            procs,
            bus,
        }
    }

    /// Runs until every child is gone or a fatal spawn failure occurs.
    ///
    /// Returns [`RuntimeError::NoChildRunning`] on a fatal spawn failure and
    /// [`RuntimeError::SignalSetup`] if the signal listeners cannot be installed.
    /// Every published event has been handled by every subscriber when this returns.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let setup = self.supervise().await;

        self.bus.publish(
            Event::new(EventKind::SupervisorStopped)
                .with_reason(self.return_status().to_string()),
        );
        let fatal = self.fatal.take();
        self.bus.close().await;

        setup?;
        match fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn supervise(&mut self) -> Result<(), RuntimeError> {
        let mut source = OsEvents::install()?;
        if self.start() == Flow::Stop {
            return Ok(());
        }

        while let Some(os_event) = source.next().await {
            let events = match os_event {
                OsEvent::Signal(sig) => vec![SupervisorEvent::SignalReceived(sig)],
                OsEvent::ChildStateChanged => self.reap(),
            };
            for ev in events {
                if self.dispatch(ev) == Flow::Stop {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Spawns every slot once; stops early on a fatal spawn failure.
    pub fn start(&mut self) -> Flow {
        for slot in 0..self.children.len() {
            self.spawn(slot);
            if self.fatal.is_some() {
                break;
            }
        }
        self.flow()
    }

    /// Processes one event and reports whether the loop should keep going.
    pub fn dispatch(&mut self, event: SupervisorEvent) -> Flow {
        match event {
            SupervisorEvent::ChildExited { slot, pid, status } => {
                self.handle_exit(slot, pid, status)
            }
            SupervisorEvent::SignalReceived(sig) => self.handle_signal(sig),
        }
        self.flow()
    }

    /// Polls every live child without blocking and collects the ones that ended.
    pub(crate) fn reap(&mut self) -> Vec<SupervisorEvent> {
        let mut exited = Vec::new();
        for child in &self.children {
            let Some(pid) = child.pid else { continue };
            let status = match self.procs.try_wait(pid) {
                Ok(Some(status)) => status,
                Ok(None) => continue,
                Err(errno) => {
                    self.bus.publish(
                        Event::new(EventKind::ChildLost)
                            .with_slot(child.id())
                            .with_pid(pid.as_raw())
                            .with_reason(errno.desc()),
                    );
                    ChildStatus::Lost
                }
            };
            exited.push(SupervisorEvent::ChildExited {
                slot: child.id(),
                pid,
                status,
            });
        }
        exited
    }

    fn flow(&self) -> Flow {
        if self.fatal.is_some() || self.running == 0 {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// Exit code for the process: 0, or the fatal sentinel after a fatal spawn failure.
    pub fn return_status(&self) -> i32 {
        if self.fatal.is_some() {
            FATAL_SPAWN_STATUS
        } else {
            0
        }
    }

    /// All child slots, indexed by slot id.
    pub fn children(&self) -> &[ChildRecord] {
        &self.children
    }

    /// Number of slots holding a live process.
    pub fn running(&self) -> usize {
        self.running
    }

    /// True once a terminate-class signal was received.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown
    }

    /// Process control backend.
    pub fn procs(&self) -> &P {
        &self.procs
    }
}
