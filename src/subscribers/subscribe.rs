//! # Subscribe: observe what the supervisor does to its children.
//!
//! A subscriber sees every [`Event`] of a run, in publish order: spawns, exits, retry
//! decisions, relayed signals and the final stop. [`LogWriter`](crate::LogWriter) is the
//! operator log; custom subscribers can count crash loops, export metrics and so on.
//!
//! `on_event` runs on the subscriber's own worker task, never inside the supervisor loop, so a
//! slow subscriber delays only itself. Its queue is unbounded: nothing is dropped, and a
//! subscriber that never catches up grows its queue instead.

use crate::events::Event;
use async_trait::async_trait;

/// Receiver of supervisor events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in stderr diagnostics about this subscriber.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
