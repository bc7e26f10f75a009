//! Runtime core: child slots, spawning, exit handling, signal relay and the event loop.
//!
//! The public API from this module is [`Supervisor`] (plus its builder), the
//! [`ProcessControl`] seam with the real [`OsProcess`] backend, and the value types
//! flowing through dispatch.
//!
//! Internal modules:
//! - [`child`]: per-slot record (id, pid, tries, last spawn);
//! - [`spawner`]: one spawn attempt under the retry ceiling;
//! - [`exit`]: retry accounting and respawn on child exit;
//! - [`relay`]: fan-out of routed signals to live children;
//! - [`source`]: OS signal listeners feeding the loop;
//! - [`process`]: fork/exec, kill and non-blocking wait;
//! - [`supervisor`]: state, dispatch and the run loop.

mod builder;
mod child;
mod exit;
mod process;
mod relay;
mod source;
mod spawner;
mod supervisor;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::SupervisorBuilder;
pub use child::ChildRecord;
pub use process::{ChildStatus, OsProcess, ProcessControl};
pub use supervisor::{Flow, Supervisor, SupervisorEvent};
