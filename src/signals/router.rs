//! # SignalRouter: "ask nicely once, then force".
//!
//! The router owns the route table and the graceful signal. For every received signal it
//! answers one question: which signal do the children get, and does this start shutdown?
//!
//! ```text
//! received ──► Route::Forward   ─► Delivery { signal: received, terminate: false }
//!          └─► Route::Terminate ─► Delivery { signal: graceful.take() or received, terminate: true }
//! ```
//!
//! The graceful signal is consumed by the first terminate-class signal. Any later
//! terminate-class signal is relayed verbatim, even when it differs from the first one.
//!
//! ## Example
//! ```rust
//! use forkwatch::{SignalName, SignalRouter, SignalRoutes};
//!
//! let mut router = SignalRouter::new(SignalRoutes::default(), Some(SignalName::Usr1));
//!
//! let first = router.route(SignalName::Term);
//! assert_eq!(first.signal, SignalName::Usr1);
//! assert!(first.terminate);
//!
//! let second = router.route(SignalName::Int);
//! assert_eq!(second.signal, SignalName::Int);
//! ```

use super::{Route, SignalName, SignalRoutes};

/// Outcome of routing one received signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// Signal to send to every live child.
    pub signal: SignalName,
    /// Whether the received signal is terminate-class (marks shutdown).
    pub terminate: bool,
}

/// Stateful signal routing policy.
#[derive(Clone, Debug)]
pub struct SignalRouter {
    routes: SignalRoutes,
    graceful: Option<SignalName>,
}

impl SignalRouter {
    /// Creates a router; `graceful = None` relays terminate-class signals verbatim from the start.
    pub fn new(routes: SignalRoutes, graceful: Option<SignalName>) -> Self {
        Self { routes, graceful }
    }

    /// Decides what to deliver for `received`, disarming the graceful signal on first terminate.
    pub fn route(&mut self, received: SignalName) -> Delivery {
        match self.routes.get(received) {
            Route::Forward => Delivery {
                signal: received,
                terminate: false,
            },
            Route::Terminate => Delivery {
                signal: self.graceful.take().unwrap_or(received),
                terminate: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_class_never_disarms() {
        let mut router = SignalRouter::new(SignalRoutes::default(), Some(SignalName::Usr1));

        for _ in 0..3 {
            let d = router.route(SignalName::Usr2);
            assert_eq!(d.signal, SignalName::Usr2);
            assert!(!d.terminate);
        }
        assert_eq!(router.route(SignalName::Term).signal, SignalName::Usr1);
    }

    #[test]
    fn test_first_terminate_substitutes_graceful() {
        let mut router = SignalRouter::new(SignalRoutes::default(), Some(SignalName::Usr1));

        let d = router.route(SignalName::Term);
        assert_eq!(
            d,
            Delivery {
                signal: SignalName::Usr1,
                terminate: true
            }
        );
        assert_eq!(router.route(SignalName::Term).signal, SignalName::Term);
    }

    #[test]
    fn test_second_terminate_is_verbatim() {
        let mut router = SignalRouter::new(SignalRoutes::default(), Some(SignalName::Usr1));
        router.route(SignalName::Term);

        let d = router.route(SignalName::Quit);
        assert_eq!(d.signal, SignalName::Quit);
        assert!(d.terminate);

        let d = router.route(SignalName::Term);
        assert_eq!(d.signal, SignalName::Term);
    }

    #[test]
    fn test_without_graceful_terminate_is_verbatim() {
        let mut router = SignalRouter::new(SignalRoutes::default(), None);
        let d = router.route(SignalName::Hup);
        assert_eq!(d.signal, SignalName::Hup);
        assert!(d.terminate);
    }

    #[test]
    fn test_reclassified_usr1_terminates() {
        let routes = SignalRoutes::default().with(SignalName::Usr1, Route::Terminate);
        let mut router = SignalRouter::new(routes, Some(SignalName::Term));

        let d = router.route(SignalName::Usr1);
        assert_eq!(d.signal, SignalName::Term);
        assert!(d.terminate);
    }
}
