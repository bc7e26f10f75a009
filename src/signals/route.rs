//! # Signal classes.
//!
//! Every [`SignalName`] belongs to exactly one [`Route`]:
//! - [`Route::Forward`] relayed verbatim to all live children, no side effects;
//! - [`Route::Terminate`] starts supervisor shutdown, then relays (see [`SignalRouter`](super::SignalRouter)).
//!
//! ## Defaults
//! ```text
//! HUP  INT  QUIT  TERM  → Terminate
//! USR1 USR2             → Forward
//! ```

use super::SignalName;

/// How a received signal is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Relay the signal as-is; the supervisor keeps running.
    Forward,
    /// Mark shutdown and relay (graceful signal first, verbatim afterwards).
    Terminate,
}

/// Route table indexed by [`SignalName`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalRoutes {
    routes: [Route; SignalName::ALL.len()],
}

impl Default for SignalRoutes {
    fn default() -> Self {
        Self {
            routes: [
                Route::Terminate, // HUP
                Route::Terminate, // INT
                Route::Terminate, // QUIT
                Route::Terminate, // TERM
                Route::Forward,   // USR1
                Route::Forward,   // USR2
            ],
        }
    }
}

impl SignalRoutes {
    /// Returns the route configured for `sig`.
    #[inline]
    pub fn get(&self, sig: SignalName) -> Route {
        self.routes[sig.index()]
    }

    /// Overrides the route of `sig`.
    pub fn set(&mut self, sig: SignalName, route: Route) {
        self.routes[sig.index()] = route;
    }

    /// Builder-style [`SignalRoutes::set`].
    #[must_use]
    pub fn with(mut self, sig: SignalName, route: Route) -> Self {
        self.set(sig, route);
        self
    }
}
