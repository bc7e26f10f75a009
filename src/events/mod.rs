//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to publish runtime
//! events emitted by the supervisor core (spawner, exit handler, signal router, loop).
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] publish point: lossless subscriber fan-out plus a `tokio::sync::broadcast` tap
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor` (spawn, exit, signal and stop paths).
//! - **Consumers**: the `SubscriberSet` handed to the bus, and any tap receiver.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
