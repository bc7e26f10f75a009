//! # Signal names understood by the supervisor.
//!
//! [`SignalName`] is the closed set of signals that can be listened for, routed and relayed.
//! Parsing accepts `TERM`, `term`, `SIGTERM` and `sigterm` alike.
//!
//! ## Example
//! ```rust
//! use forkwatch::SignalName;
//!
//! let sig: SignalName = "sigusr1".parse().unwrap();
//! assert_eq!(sig, SignalName::Usr1);
//! assert_eq!(sig.to_string(), "USR1");
//! ```

use std::fmt;
use std::str::FromStr;

use nix::sys::signal::Signal;

use crate::error::ConfigError;

/// One of the signals the supervisor listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalName {
    Hup,
    Int,
    Quit,
    Term,
    Usr1,
    Usr2,
}

impl SignalName {
    /// Every listened signal, in table order.
    pub const ALL: [SignalName; 6] = [
        SignalName::Hup,
        SignalName::Int,
        SignalName::Quit,
        SignalName::Term,
        SignalName::Usr1,
        SignalName::Usr2,
    ];

    /// Short upper-case name without the `SIG` prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            SignalName::Hup => "HUP",
            SignalName::Int => "INT",
            SignalName::Quit => "QUIT",
            SignalName::Term => "TERM",
            SignalName::Usr1 => "USR1",
            SignalName::Usr2 => "USR2",
        }
    }

    /// The OS-level signal.
    pub fn to_signal(self) -> Signal {
        match self {
            SignalName::Hup => Signal::SIGHUP,
            SignalName::Int => Signal::SIGINT,
            SignalName::Quit => Signal::SIGQUIT,
            SignalName::Term => Signal::SIGTERM,
            SignalName::Usr1 => Signal::SIGUSR1,
            SignalName::Usr2 => Signal::SIGUSR2,
        }
    }

    /// Position in [`SignalName::ALL`].
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("SIG").unwrap_or(&upper);
        SignalName::ALL
            .into_iter()
            .find(|sig| sig.as_str() == bare)
            .ok_or_else(|| ConfigError::UnknownSignal {
                name: s.to_string(),
            })
    }
}

impl From<SignalName> for Signal {
    fn from(name: SignalName) -> Self {
        name.to_signal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_prefix_and_case() {
        assert_eq!("TERM".parse::<SignalName>().unwrap(), SignalName::Term);
        assert_eq!("sigterm".parse::<SignalName>().unwrap(), SignalName::Term);
        assert_eq!(" Hup ".parse::<SignalName>().unwrap(), SignalName::Hup);
        assert_eq!("SIGUSR2".parse::<SignalName>().unwrap(), SignalName::Usr2);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "KILL".parse::<SignalName>().unwrap_err();
        assert_eq!(err.as_label(), "config_unknown_signal");
        assert!("SIG".parse::<SignalName>().is_err());
        assert!("".parse::<SignalName>().is_err());
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, sig) in SignalName::ALL.into_iter().enumerate() {
            assert_eq!(sig.index(), i, "{sig} out of place");
        }
    }

    #[test]
    fn test_maps_to_os_signal() {
        assert_eq!(SignalName::Usr1.to_signal(), Signal::SIGUSR1);
        assert_eq!(Signal::from(SignalName::Quit), Signal::SIGQUIT);
    }
}
