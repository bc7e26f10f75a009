//! # Supervisor configuration.
//!
//! Provides [`Config`], the read-only settings the supervision core runs with.
//! It is produced by the CLI layer (or built directly by library users) and checked once
//! with [`Config::validate`] before any child is spawned.
//!
//! ## Sentinel values
//! - `retry.reset_after = 0s` → every death resets the streak (unlimited retries)
//! - `graceful = None` → terminate-class signals are relayed verbatim from the start

use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;

use crate::error::ConfigError;
use crate::policies::RetryPolicy;
use crate::signals::{SignalName, SignalRoutes};

/// Configuration for one supervisor run.
///
/// ## Field semantics
/// - `argv`: program path followed by its arguments (`argv[0]` is executed and passed as argv[0])
/// - `forks`: number of parallel child slots (`>= 1`)
/// - `retry`: attempt ceiling and streak-reset window
/// - `graceful`: signal sent instead of the first terminate-class signal
/// - `routes`: which signals forward and which terminate
/// - `bus_capacity`: ring size of the bus's broadcast tap (min 1); subscribers are unaffected
#[derive(Clone, Debug)]
pub struct Config {
    /// Program path and arguments.
    pub argv: Vec<OsString>,

    /// Number of child slots.
    pub forks: usize,

    /// Retry policy shared by all slots.
    pub retry: RetryPolicy,

    /// Graceful-termination signal, or `None`.
    pub graceful: Option<SignalName>,

    /// Signal class table.
    pub routes: SignalRoutes,

    /// Capacity of the event bus broadcast tap.
    ///
    /// Tap receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `argv = []` (must be set before validation)
    /// - `forks = 1`
    /// - `retry = RetryPolicy::default()` (3 retries, 10s window)
    /// - `graceful = None`
    /// - `routes = SignalRoutes::default()`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            argv: Vec::new(),
            forks: 1,
            retry: RetryPolicy::default(),
            graceful: None,
            routes: SignalRoutes::default(),
            bus_capacity: 1024,
        }
    }
}

impl Config {
    /// Creates a default configuration running `argv`.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks the invariants the core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.argv.first() {
            None => return Err(ConfigError::MissingProgram),
            Some(p) if p.is_empty() => return Err(ConfigError::MissingProgram),
            Some(_) => {}
        }
        if self.forks == 0 {
            return Err(ConfigError::InvalidForks { value: 0 });
        }
        if self.retry.max_retries == 0 {
            return Err(ConfigError::InvalidRetry { value: 0 });
        }
        if let Some(arg) = self.argv.iter().find(|a| a.as_bytes().contains(&0)) {
            return Err(ConfigError::NulByte {
                arg: arg.to_string_lossy().into_owned(),
            });
        }
        Ok(())
    }
}
