//! Error types used by the forkwatch runtime and its configuration.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`]: invalid configuration, detected before any child is spawned.
//! - [`RuntimeError`]: failures of the supervision loop itself.
//!
//! Both types provide `as_label` (a stable snake_case tag) and `exit_code`, the status the
//! binary hands to the OS. [`RuntimeError::as_message`] adds a human-readable line for logs.
//!
//! Retry exhaustion is deliberately **not** an error: a slot that runs out of attempts goes
//! idle and is only visible through the [`EventKind::RetriesExhausted`](crate::EventKind) event.

use std::io;

use nix::errno::Errno;
use thiserror::Error;

use crate::signals::SignalName;

/// Process exit status used when a fork fails while no child is running.
pub const FATAL_SPAWN_STATUS: i32 = -100;

/// # Configuration errors.
///
/// Raised by option parsing or [`Config::validate`](crate::Config::validate).
/// No supervision happens when one of these is returned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No program to run.
    #[error("missing application")]
    MissingProgram,

    /// Fork count below 1 (or out of range).
    #[error("invalid forks argument: {value}")]
    InvalidForks {
        /// The rejected value.
        value: i64,
    },

    /// Retry count below 1 (or out of range).
    #[error("invalid retry argument: {value}")]
    InvalidRetry {
        /// The rejected value.
        value: i64,
    },

    /// Negative retry timeout.
    #[error("invalid timeout argument: {value}")]
    InvalidTimeout {
        /// The rejected value (milliseconds).
        value: i64,
    },

    /// Signal name outside the supported set.
    #[error("unknown signal: {name}")]
    UnknownSignal {
        /// The name as given.
        name: String,
    },

    /// The same signal was asked to both forward and terminate.
    #[error("signal {signal} cannot be both forwarded and terminating")]
    ConflictingRoute {
        /// The signal named twice.
        signal: SignalName,
    },

    /// Program path or argument contains an interior NUL byte.
    #[error("argument contains a NUL byte: {arg:?}")]
    NulByte {
        /// The offending argument (lossy).
        arg: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use forkwatch::ConfigError;
    ///
    /// let err = ConfigError::InvalidForks { value: 0 };
    /// assert_eq!(err.as_label(), "config_invalid_forks");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingProgram => "config_missing_program",
            ConfigError::InvalidForks { .. } => "config_invalid_forks",
            ConfigError::InvalidRetry { .. } => "config_invalid_retry",
            ConfigError::InvalidTimeout { .. } => "config_invalid_timeout",
            ConfigError::UnknownSignal { .. } => "config_unknown_signal",
            ConfigError::ConflictingRoute { .. } => "config_conflicting_route",
            ConfigError::NulByte { .. } => "config_nul_byte",
        }
    }

    /// Exit status reported to the OS for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::MissingProgram => -2,
            ConfigError::InvalidForks { .. } => -3,
            ConfigError::InvalidRetry { .. } => -4,
            ConfigError::InvalidTimeout { .. } => -5,
            ConfigError::UnknownSignal { .. }
            | ConfigError::ConflictingRoute { .. }
            | ConfigError::NulByte { .. } => -1,
        }
    }
}

/// # Errors produced by the forkwatch runtime.
///
/// These represent failures of the supervision loop, not of individual children:
/// a child that fails to exec or crashes is handled by the retry policy instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Fork failed while no other child was running; nothing is left to supervise.
    #[error("couldn't fork child[{slot}] and no child is running: {source}")]
    NoChildRunning {
        /// Slot whose spawn failed.
        slot: usize,
        /// OS error reported by fork.
        source: Errno,
    },

    /// Installing the signal listeners failed.
    #[error("failed to install signal listeners: {0}")]
    SignalSetup(#[from] io::Error),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use forkwatch::RuntimeError;
    /// use nix::errno::Errno;
    ///
    /// let err = RuntimeError::NoChildRunning { slot: 0, source: Errno::EAGAIN };
    /// assert_eq!(err.as_label(), "runtime_no_child_running");
    /// assert_eq!(err.exit_code(), -100);
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoChildRunning { .. } => "runtime_no_child_running",
            RuntimeError::SignalSetup(_) => "runtime_signal_setup",
            RuntimeError::Config(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NoChildRunning { slot, source } => {
                format!("no child running and fork of child[{slot}] failed: {}", source.desc())
            }
            RuntimeError::SignalSetup(e) => format!("signal setup: {e}"),
            RuntimeError::Config(e) => e.to_string(),
        }
    }

    /// Exit status reported to the OS for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::NoChildRunning { .. } => FATAL_SPAWN_STATUS,
            RuntimeError::SignalSetup(_) => -1,
            RuntimeError::Config(e) => e.exit_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_exit_codes_are_distinct() {
        let codes = [
            ConfigError::MissingProgram.exit_code(),
            ConfigError::InvalidForks { value: 0 }.exit_code(),
            ConfigError::InvalidRetry { value: 0 }.exit_code(),
            ConfigError::InvalidTimeout { value: -1 }.exit_code(),
        ];
        assert_eq!(codes, [-2, -3, -4, -5]);
    }

    #[test]
    fn test_runtime_wraps_config() {
        let err = RuntimeError::from(ConfigError::MissingProgram);
        assert_eq!(err.exit_code(), -2);
        assert_eq!(err.as_label(), "config_missing_program");
        assert_eq!(err.to_string(), "missing application");
    }

    #[test]
    fn test_fatal_message_names_slot() {
        let err = RuntimeError::NoChildRunning {
            slot: 3,
            source: Errno::ENOMEM,
        };
        assert!(err.to_string().contains("child[3]"));
        assert!(err.as_message().contains("child[3]"));
    }
}
