//! Signal names, routing table and the router that decides what children receive.
//!
//! ## Contents
//! - [`SignalName`] the fixed set of signals the supervisor listens for
//! - [`Route`], [`SignalRoutes`] which class each signal belongs to (forward / terminate)
//! - [`SignalRouter`] the stateful policy applied on every received signal
//!
//! ## Quick wiring
//! ```text
//! OS signal ──► core::source ──► SupervisorEvent::SignalReceived(name)
//!                                   └─► SignalRouter::route(name) ─► Delivery { signal, terminate }
//!                                          └─► Supervisor fans `signal` out to every live child
//! ```

mod name;
mod route;
mod router;

pub use name::SignalName;
pub use route::{Route, SignalRoutes};
pub use router::{Delivery, SignalRouter};
