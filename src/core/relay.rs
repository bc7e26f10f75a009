//! # Signal relay: apply the router's decision to every live child.
//!
//! ```text
//! SignalReceived(sig)
//!   ├─► router.route(sig) ─► Delivery { signal, terminate }
//!   ├─► terminate && !shutdown ─► shutdown = true, ShutdownRequested
//!   ├─► kill(pid, signal) for every slot holding a pid
//!   └─► SignalForwarded { received, delivered, count }
//! ```
//!
//! A failed `kill` (the child died and is not reaped yet) is reported and skipped.

use crate::events::{Event, EventKind};
use crate::signals::SignalName;

use super::{ProcessControl, Supervisor};

impl<P: ProcessControl> Supervisor<P> {
    pub(crate) fn handle_signal(&mut self, received: SignalName) {
        let delivery = self.router.route(received);

        if delivery.terminate && !self.shutdown {
            self.shutdown = true;
            self.bus
                .publish(Event::new(EventKind::ShutdownRequested).with_signal(received));
        }

        let mut count = 0;
        for child in &self.children {
            let Some(pid) = child.pid else { continue };
            match self.procs.kill(pid, delivery.signal) {
                Ok(()) => count += 1,
                Err(errno) => self.bus.publish(
                    Event::new(EventKind::SignalFailed)
                        .with_slot(child.id())
                        .with_pid(pid.as_raw())
                        .with_delivered(delivery.signal)
                        .with_reason(errno.desc()),
                ),
            }
        }

        self.bus.publish(
            Event::new(EventKind::SignalForwarded)
                .with_signal(received)
                .with_delivered(delivery.signal)
                .with_count(count),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::core::testing::{exit_fast, kinds, supervisor};
    use crate::core::{Flow, SupervisorEvent};
    use crate::events::EventKind;
    use crate::signals::{Route, SignalName, SignalRouter};

    #[tokio::test(start_paused = true)]
    async fn test_first_terminate_sends_graceful_signal() {
        let mut sup = supervisor(3, 3, 1000, Some(SignalName::Usr1));
        sup.start();
        let mut rx = sup.bus.subscribe();

        let flow = sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Term));
        assert_eq!(flow, Flow::Continue);
        assert!(sup.is_shutting_down());
        assert_eq!(sup.procs().signals(), vec![SignalName::Usr1; 3]);
        assert_eq!(
            kinds(&mut rx),
            vec![EventKind::ShutdownRequested, EventKind::SignalForwarded]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_terminate_is_forwarded_verbatim() {
        let mut sup = supervisor(2, 3, 1000, Some(SignalName::Usr1));
        sup.start();
        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Term));
        sup.procs.killed.clear();
        let mut rx = sup.bus.subscribe();

        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Int));
        assert_eq!(sup.procs().signals(), vec![SignalName::Int; 2]);
        assert_eq!(kinds(&mut rx), vec![EventKind::SignalForwarded]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forward_class_leaves_shutdown_untouched() {
        let mut sup = supervisor(2, 3, 1000, Some(SignalName::Usr1));
        sup.start();

        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Usr2));
        assert!(!sup.is_shutting_down());
        assert_eq!(sup.procs().signals(), vec![SignalName::Usr2; 2]);

        // graceful signal is still armed afterwards
        sup.procs.killed.clear();
        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Hup));
        assert_eq!(sup.procs().signals(), vec![SignalName::Usr1; 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_live_children_are_signalled() {
        let mut sup = supervisor(3, 1, 1000, None);
        sup.start();
        exit_fast(&mut sup, 1);
        exit_fast(&mut sup, 1);
        assert!(!sup.children()[1].is_running());

        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Usr1));
        let targets: Vec<_> = sup.procs().killed.iter().map(|(pid, _)| *pid).collect();
        let live: Vec<_> = sup.children().iter().filter_map(|c| c.pid()).collect();
        assert_eq!(targets, live);
        assert_eq!(targets.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_kill_is_reported_and_skipped() {
        let mut sup = supervisor(2, 3, 1000, None);
        sup.start();
        let dead = sup.children()[0].pid().unwrap();
        sup.procs.unkillable.insert(dead);
        let mut rx = sup.bus.subscribe();

        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Usr2));
        assert_eq!(sup.procs().killed.len(), 1);

        let mut forwarded = None;
        let mut failed = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::SignalFailed => failed += 1,
                EventKind::SignalForwarded => forwarded = ev.count,
                _ => {}
            }
        }
        assert_eq!(failed, 1);
        assert_eq!(forwarded, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reclassified_signal_starts_shutdown() {
        let mut sup = supervisor(1, 3, 1000, None);
        let routes = sup.cfg.routes.clone().with(SignalName::Usr1, Route::Terminate);
        sup.router = SignalRouter::new(routes, Some(SignalName::Quit));
        sup.start();

        sup.dispatch(SupervisorEvent::SignalReceived(SignalName::Usr1));
        assert!(sup.is_shutting_down());
        assert_eq!(sup.procs().signals(), vec![SignalName::Quit]);
    }
}
