//! # OS event source.
//!
//! Turns process-level signals into loop events. One listener per routed signal plus
//! `SIGCHLD`, which only says "some child changed state"; the supervisor then polls its
//! own pids (see `Supervisor::reap`).
//!
//! ## Signals
//! - `SIGHUP`, `SIGINT`, `SIGQUIT`, `SIGTERM`, `SIGUSR1`, `SIGUSR2` → [`OsEvent::Signal`]
//! - `SIGCHLD` → [`OsEvent::ChildStateChanged`]
//!
//! Listeners must be installed before the first fork so an early exit is not missed.
//! Repeated deliveries of one signal between two polls may be coalesced into one event.

use tokio::signal::unix::{signal, Signal, SignalKind};

use crate::signals::SignalName;

/// Event observed from the operating system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OsEvent {
    Signal(SignalName),
    ChildStateChanged,
}

/// Installed signal listeners.
pub(crate) struct OsEvents {
    hup: Signal,
    int: Signal,
    quit: Signal,
    term: Signal,
    usr1: Signal,
    usr2: Signal,
    chld: Signal,
}

impl OsEvents {
    /// Installs all listeners.
    ///
    /// Returns `Err` if signal registration fails.
    pub(crate) fn install() -> std::io::Result<Self> {
        let listen = |sig: SignalName| signal(SignalKind::from_raw(sig.to_signal() as i32));
        Ok(Self {
            hup: listen(SignalName::Hup)?,
            int: listen(SignalName::Int)?,
            quit: listen(SignalName::Quit)?,
            term: listen(SignalName::Term)?,
            usr1: listen(SignalName::Usr1)?,
            usr2: listen(SignalName::Usr2)?,
            chld: signal(SignalKind::child())?,
        })
    }

    /// Waits for the next event; `None` once every listener is closed.
    pub(crate) async fn next(&mut self) -> Option<OsEvent> {
        tokio::select! {
            Some(()) = self.chld.recv() => Some(OsEvent::ChildStateChanged),
            Some(()) = self.hup.recv()  => Some(OsEvent::Signal(SignalName::Hup)),
            Some(()) = self.int.recv()  => Some(OsEvent::Signal(SignalName::Int)),
            Some(()) = self.quit.recv() => Some(OsEvent::Signal(SignalName::Quit)),
            Some(()) = self.term.recv() => Some(OsEvent::Signal(SignalName::Term)),
            Some(()) = self.usr1.recv() => Some(OsEvent::Signal(SignalName::Usr1)),
            Some(()) = self.usr2.recv() => Some(OsEvent::Signal(SignalName::Usr2)),
            else => None,
        }
    }
}
