//! # forkwatch
//!
//! **forkwatch** forks and watches multiple instances of a program in the same environment.
//!
//! It launches `forks` identical children, restarts the ones that die under a bounded retry
//! policy, and relays operating-system signals from the supervisor to every child. One
//! class of signals is treated as "terminate the supervisor": the first one may be replaced
//! by a configured graceful signal, later ones are relayed verbatim.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        ┌───────────────┐    ┌───────────────┐         ┌───────────────┐
//!        │   child[0]    │    │   child[1]    │   ...   │  child[F-1]   │
//!        │ (ChildRecord) │    │ (ChildRecord) │         │ (ChildRecord) │
//!        └──────▲────────┘    └──────▲────────┘         └──────▲────────┘
//!               │ fork/exec, kill    │                         │
//! ┌─────────────┴────────────────────┴─────────────────────────┴──────────┐
//! │  Supervisor (single-threaded event loop)                              │
//! │  - Spawner      (retry ceiling, fatal fork handling)                  │
//! │  - Exit handler (streak reset window, respawn)                        │
//! │  - Relay        (SignalRouter: forward / graceful-then-forward)       │
//! └──────▲──────────────────────────────────────────────────────┬─────────┘
//!        │ OsEvent (HUP INT QUIT TERM USR1 USR2 CHLD)           │ publish(Event)
//! ┌──────┴───────┐                                       ┌──────▼────────┐
//! │  OS signals  │                                       │      Bus      │
//! └──────────────┘                                       └──────┬────────┘
//!                                                               ▼
//!                                                        SubscriberSet ─► LogWriter, ...
//!                                                        (unbounded per-subscriber queues)
//! ```
//!
//! ### Lifecycle of a slot
//! ```text
//! spawn(slot):  prior = tries++ ; prior > max_retries ? idle forever : fork
//!
//! child exits:
//!   ├─ shutdown requested      ─► stay down
//!   ├─ uptime > reset_after    ─► tries = 0, spawn(slot)
//!   └─ uptime <= reset_after   ─► spawn(slot)   (streak continues)
//!
//! loop ends when running == 0, or at once when a fork fails with nothing running
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                      |
//! |-------------------|--------------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Fork, watch and respawn `forks` copies of a program.         | [`Supervisor`], [`ChildRecord`]         |
//! | **Policies**      | Attempt ceiling per failure streak and streak reset window.  | [`RetryPolicy`]                         |
//! | **Signals**       | Forward or graceful-then-forward routing per signal.         | [`SignalRouter`], [`SignalRoutes`]      |
//! | **Subscriber API**| Hook into supervisor events (logging, metrics).              | [`Subscribe`], [`LogWriter`]            |
//! | **Errors**        | Typed configuration and runtime errors with exit codes.      | [`ConfigError`], [`RuntimeError`]       |
//! | **Configuration** | Program, fork count, retry policy, signal settings.          | [`Config`]                              |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use forkwatch::{Config, LogWriter, RetryPolicy, SignalName, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::new(["/usr/bin/php-cgi", "-b", "127.0.0.1:9000"]);
//!     cfg.forks = 4;
//!     cfg.retry = RetryPolicy { max_retries: 3, reset_after: Duration::from_secs(10) };
//!     cfg.graceful = Some(SignalName::Usr1);
//!
//!     let sup = Supervisor::builder(cfg)
//!         .with_subscribers(vec![Arc::new(LogWriter::new())])
//!         .build()?;
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(unix))]
compile_error!("forkwatch supervises processes with fork/exec and only builds on unix");

mod config;
mod core;
mod error;
mod events;
mod policies;
mod signals;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{
    ChildRecord, ChildStatus, Flow, OsProcess, ProcessControl, Supervisor, SupervisorBuilder,
    SupervisorEvent,
};
pub use error::{ConfigError, RuntimeError, FATAL_SPAWN_STATUS};
pub use events::{Bus, Event, EventKind};
pub use policies::RetryPolicy;
pub use signals::{Delivery, Route, SignalName, SignalRouter, SignalRoutes};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
