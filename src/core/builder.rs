use std::sync::Arc;

use crate::{
    config::Config,
    error::ConfigError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

use super::{
    process::{OsProcess, ProcessControl},
    supervisor::Supervisor,
};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Each subscriber gets every event of the run on its own worker task.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds a supervisor that forks real processes.
    ///
    /// Validates the configuration and prepares the exec arguments. Must be called
    /// inside a tokio runtime when subscribers are set (their workers are spawned here).
    pub fn build(self) -> Result<Supervisor<OsProcess>, ConfigError> {
        self.cfg.validate()?;
        let procs = OsProcess::new(&self.cfg)?;
        self.build_with(procs)
    }

    /// Builds a supervisor on top of a custom [`ProcessControl`] backend.
    pub fn build_with<P: ProcessControl>(self, procs: P) -> Result<Supervisor<P>, ConfigError> {
        self.cfg.validate()?;
        let bus = Bus::with_subscribers(
            self.cfg.bus_capacity_clamped(),
            SubscriberSet::new(self.subscribers),
        );
        Ok(Supervisor::new_internal(self.cfg, procs, bus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeProcs;

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut cfg = Config::new(["/bin/true"]);
        cfg.forks = 0;
        let err = SupervisorBuilder::new(cfg)
            .build_with(FakeProcs::default())
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::InvalidForks { value: 0 });
    }

    #[test]
    fn test_build_creates_idle_slots() {
        let mut cfg = Config::new(["/bin/true"]);
        cfg.forks = 3;
        let sup = SupervisorBuilder::new(cfg)
            .build_with(FakeProcs::default())
            .unwrap();

        assert_eq!(sup.children().len(), 3);
        assert_eq!(sup.running(), 0);
        assert!(sup.children().iter().all(|c| c.pid().is_none() && c.tries() == 0));
    }
}
