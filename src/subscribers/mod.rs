//! # Event subscribers for the forkwatch runtime.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling runtime events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Supervisor ── publish(Event) ──► Bus ──► SubscriberSet
//!                                                  │
//!                                    ┌─────────────┼──────────┐
//!                                    ▼             ▼          ▼
//!                                LogWriter      Metrics    Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use forkwatch::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct CrashCounter;
//!
//! #[async_trait]
//! impl Subscribe for CrashCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::SpawnRetrying {
//!             // increment crash-loop counter
//!         }
//!     }
//! }
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
