//! Process-wide state handed to every command handler.

use vidtoolz_core::{ProcessRunner, SystemRunner, Toolkit, ToolkitConfig};

use crate::config::DiscoveryConfig;
use crate::registry::ProviderRegistry;

/// Built once in `run` and passed by reference; nothing here is global.
pub struct AppContext {
    registry: ProviderRegistry,
    config: ToolkitConfig,
    runner: Box<dyn ProcessRunner>,
}

impl AppContext {
    pub fn new(
        config: ToolkitConfig,
        runner: Box<dyn ProcessRunner>,
        discovery: DiscoveryConfig,
    ) -> Self {
        Self {
            registry: ProviderRegistry::new(discovery),
            config,
            runner,
        }
    }

    /// Context for a real run: environment configuration and real processes.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            ToolkitConfig::from_env(),
            Box::new(SystemRunner),
            DiscoveryConfig::from_env(),
        )
    }

    #[must_use]
    pub fn toolkit(&self) -> Toolkit<'_> {
        Toolkit::new(self.runner.as_ref(), &self.config)
    }

    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }
}
