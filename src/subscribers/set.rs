//! # SubscriberSet: lossless fan-out from the supervisor to its subscribers.
//!
//! The supervisor publishes synchronously from `dispatch` and never awaits, so the set must
//! accept any burst without blocking and without dropping. Each subscriber gets its own
//! unbounded queue and worker task:
//!
//! ```text
//!   Bus::publish(ev)
//!        │  emit(&ev): Arc-clone per subscriber, never blocks
//!        ├──► [queue LogWriter] ─► worker ─► on_event()
//!        └──► [queue Custom]    ─► worker ─► on_event()
//! ```
//!
//! - Per-subscriber FIFO; no ordering across subscribers.
//! - A panicking `on_event` is reported with the event it failed on; the worker keeps going.
//! - An event can only be missed if a worker is gone (runtime shutting down). That is
//!   reported on stderr with the subscriber, the event kind and the slot.
//! - [`SubscriberSet::shutdown`] returns once every queued event has been handled.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

struct Worker {
    name: &'static str,
    queue: mpsc::UnboundedSender<Arc<Event>>,
    handle: JoinHandle<()>,
}

/// Subscribers of one supervisor run, each behind its own queue.
#[derive(Default)]
pub struct SubscriberSet {
    workers: Vec<Worker>,
}

impl SubscriberSet {
    /// Starts one worker per subscriber.
    ///
    /// Must be called inside a tokio runtime unless `subs` is empty.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let workers = subs.into_iter().map(Self::start_worker).collect();
        Self { workers }
    }

    fn start_worker(sub: Arc<dyn Subscribe>) -> Worker {
        let name = sub.name();
        let (queue, mut rx) = mpsc::unbounded_channel::<Arc<Event>>();
        let handle = tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let handled = std::panic::AssertUnwindSafe(sub.on_event(&ev))
                    .catch_unwind()
                    .await;
                if handled.is_err() {
                    eprintln!(
                        "[forkwatch] subscriber '{name}' panicked on {:?} event (seq={}, child={})",
                        ev.kind,
                        ev.seq,
                        slot_of(&ev)
                    );
                }
            }
        });
        Worker { name, queue, handle }
    }

    /// Queues `event` for every subscriber. Never blocks.
    pub fn emit(&self, event: &Event) {
        if self.workers.is_empty() {
            return;
        }
        let ev = Arc::new(event.clone());
        for w in &self.workers {
            if w.queue.send(Arc::clone(&ev)).is_err() {
                eprintln!(
                    "[forkwatch] subscriber '{}' is gone, missed {:?} event (seq={}, child={})",
                    w.name,
                    ev.kind,
                    ev.seq,
                    slot_of(&ev)
                );
            }
        }
    }

    /// Closes every queue and waits for the workers to drain them.
    pub async fn shutdown(self) {
        let handles: Vec<_> = self
            .workers
            .into_iter()
            .map(|w| {
                drop(w.queue);
                w.handle
            })
            .collect();
        for h in handles {
            let _ = h.await;
        }
    }
}

fn slot_of(ev: &Event) -> String {
    ev.slot.map_or_else(|| "-".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Slots(Mutex<Vec<usize>>);

    #[async_trait]
    impl Subscribe for Slots {
        async fn on_event(&self, event: &Event) {
            if let Some(slot) = event.slot {
                self.0.lock().unwrap().push(slot);
            }
        }
    }

    struct Counter(AtomicUsize);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicky;

    #[async_trait]
    impl Subscribe for Panicky {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicky"
        }
    }

    #[tokio::test]
    async fn test_burst_is_delivered_in_order() {
        let slots = Arc::new(Slots(Mutex::new(Vec::new())));
        let set = SubscriberSet::new(vec![slots.clone() as Arc<dyn Subscribe>]);

        for slot in 0..3000 {
            set.emit(&Event::new(EventKind::ChildExited).with_slot(slot));
        }
        set.shutdown().await;

        let seen = slots.0.lock().unwrap();
        assert_eq!(seen.len(), 3000);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let set = SubscriberSet::new(vec![
            Arc::new(Panicky) as Arc<dyn Subscribe>,
            counter.clone() as Arc<dyn Subscribe>,
        ]);

        set.emit(&Event::new(EventKind::ChildExited));
        set.emit(&Event::new(EventKind::ChildExited));
        set.shutdown().await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_set_needs_no_runtime() {
        let set = SubscriberSet::default();
        set.emit(&Event::new(EventKind::SupervisorStopped));
    }

    #[test]
    fn test_slot_rendering() {
        assert_eq!(slot_of(&Event::new(EventKind::SpawnFailed).with_slot(4)), "4");
        assert_eq!(slot_of(&Event::new(EventKind::SupervisorStopped)), "-");
    }
}
