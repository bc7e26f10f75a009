//! # LogWriter: operator event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stderr, one line per event.
//! This is the supervisor's operator-facing log; the binary always installs it.
//!
//! ## Example output
//! ```text
//! [spawned] child=0 pid=4711 attempt=1
//! [exited] child=0 pid=4711 status=exit 1 uptime=3ms
//! [retry] child=0 attempt=1 uptime=3ms spawn failed, next try
//! [exhausted] child=0 attempts=4 died too often, not forking again
//! [respawn] child=1 uptime=61020ms
//! [shutdown-requested] signal=TERM
//! [signal] received=TERM delivered=USR1 children=2
//! [stopped] status=0
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one event as a log line.
    pub fn format(e: &Event) -> String {
        let slot = Opt(e.slot);
        let pid = Opt(e.pid);
        let reason = e.reason.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::ChildSpawned => {
                format!("[spawned] child={slot} pid={pid} attempt={}", Opt(e.attempt))
            }
            EventKind::SpawnFailed => {
                format!("[spawn-failed] child={slot} err={reason}")
            }
            EventKind::RetriesExhausted => format!(
                "[exhausted] child={slot} attempts={} died too often, not forking again",
                Opt(e.attempt)
            ),
            EventKind::ChildExited => format!(
                "[exited] child={slot} pid={pid} status={} uptime={}ms",
                Opt(e.status),
                Opt(e.uptime_ms)
            ),
            EventKind::ChildLost => {
                format!("[lost] child={slot} pid={pid} err={reason}")
            }
            EventKind::ChildRespawning => {
                format!("[respawn] child={slot} uptime={}ms", Opt(e.uptime_ms))
            }
            EventKind::SpawnRetrying => format!(
                "[retry] child={slot} attempt={} uptime={}ms spawn failed, next try",
                Opt(e.attempt),
                Opt(e.uptime_ms)
            ),
            EventKind::ShutdownRequested => {
                format!("[shutdown-requested] signal={}", Opt(e.signal))
            }
            EventKind::SignalForwarded => format!(
                "[signal] received={} delivered={} children={}",
                Opt(e.signal),
                Opt(e.delivered),
                Opt(e.count)
            ),
            EventKind::SignalFailed => format!(
                "[signal-failed] child={slot} pid={pid} signal={} err={reason}",
                Opt(e.delivered)
            ),
            EventKind::FatalNoChildren => {
                format!("[fatal] child={slot} err={reason} no child running and fork failed, exiting")
            }
            EventKind::SupervisorStopped => format!("[stopped] status={reason}"),
        }
    }
}

/// Prints `-` for absent fields.
struct Opt<T>(Option<T>);

impl<T: std::fmt::Display> std::fmt::Display for Opt<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("-"),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        eprintln!("{}", Self::format(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChildStatus;
    use crate::signals::SignalName;
    use std::time::Duration;

    #[test]
    fn test_exit_line() {
        let ev = Event::new(EventKind::ChildExited)
            .with_slot(0)
            .with_pid(4711)
            .with_status(ChildStatus::Exited(1))
            .with_uptime(Duration::from_millis(3));
        assert_eq!(
            LogWriter::format(&ev),
            "[exited] child=0 pid=4711 status=exit 1 uptime=3ms"
        );
    }

    #[test]
    fn test_signal_line() {
        let ev = Event::new(EventKind::SignalForwarded)
            .with_signal(SignalName::Term)
            .with_delivered(SignalName::Usr1)
            .with_count(2);
        assert_eq!(
            LogWriter::format(&ev),
            "[signal] received=TERM delivered=USR1 children=2"
        );
    }

    #[test]
    fn test_missing_fields_render_as_dash() {
        let ev = Event::new(EventKind::ChildSpawned);
        assert_eq!(LogWriter::format(&ev), "[spawned] child=- pid=- attempt=-");
    }
}
