//! # Event bus: the single publish point of the supervisor.
//!
//! Every [`Event`] published by the core goes two ways:
//!
//! ```text
//! Supervisor ── publish(ev) ──┬──► SubscriberSet::emit   (lossless, one queue per subscriber)
//!                             └──► broadcast tap          (bounded ring, may lag)
//! ```
//!
//! Subscribers are fed directly from `publish`, so a burst of thousands of events from one
//! dispatch (e.g. many children reaped at once) reaches the operator log in full, even though
//! the loop never yields in between. The broadcast tap is for in-process observers that want
//! a `Receiver`; those skip the oldest events when they fall more than `capacity` behind.

use tokio::sync::broadcast;

use crate::subscribers::SubscriberSet;

use super::event::Event;

/// Publish point owned by the supervisor.
pub struct Bus {
    subs: SubscriberSet,
    tap: broadcast::Sender<Event>,
}

impl Bus {
    /// Bus without subscribers; `capacity` (minimum 1) sizes the broadcast tap.
    pub fn new(capacity: usize) -> Self {
        Self::with_subscribers(capacity, SubscriberSet::default())
    }

    /// Bus that feeds `subs` with every published event.
    pub fn with_subscribers(capacity: usize, subs: SubscriberSet) -> Self {
        let (tap, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { subs, tap }
    }

    /// Hands `ev` to every subscriber, then to tap receivers (if any).
    pub fn publish(&self, ev: Event) {
        self.subs.emit(&ev);
        let _ = self.tap.send(ev);
    }

    /// Receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tap.subscribe()
    }

    /// Closes the tap and waits until every subscriber has handled every event.
    pub async fn close(self) {
        drop(self.tap);
        self.subs.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::subscribers::Subscribe;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Exhausted(AtomicUsize);

    #[async_trait]
    impl Subscribe for Exhausted {
        async fn on_event(&self, event: &Event) {
            if event.kind == EventKind::RetriesExhausted {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_tap_sees_events_after_subscribe() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::ChildSpawned).with_slot(9));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ChildSpawned).with_slot(1));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.slot, Some(1));
    }

    #[tokio::test]
    async fn test_tap_closed_by_close() {
        let bus = Bus::new(4);
        let mut rx = bus.subscribe();
        bus.close().await;
        assert!(rx.recv().await.is_err());
    }

    #[tokio::test]
    async fn test_burst_beyond_tap_capacity_reaches_subscribers() {
        let counter = Arc::new(Exhausted(AtomicUsize::new(0)));
        let bus = Bus::with_subscribers(
            8,
            SubscriberSet::new(vec![counter.clone() as Arc<dyn Subscribe>]),
        );

        for slot in 0..5000 {
            bus.publish(Event::new(EventKind::RetriesExhausted).with_slot(slot));
        }
        bus.close().await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 5000);
    }
}
