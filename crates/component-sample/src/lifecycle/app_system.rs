use crate::components::{self, OrderService, SERVICE};
use component_registry::{Handle, Phase, Registry, RegistryConfig, RegistryError};
use tracing::{error, info};

/// The runtime orchestrator for the inventory application.
///
/// Construction registers and creates every component; [`AppSystem::start`]
/// wires and initializes them.
///
/// # Example
///
/// ```
/// use component_registry::RegistryConfig;
/// use component_sample::lifecycle::AppSystem;
/// use component_sample::model::ProductId;
///
/// let mut system = AppSystem::new(RegistryConfig::default()).unwrap();
/// system.start().unwrap();
///
/// let service = system.service().unwrap();
/// let before = service.borrow().stock(ProductId(1)).unwrap();
/// let after = service.borrow_mut().reserve(ProductId(1), 1).unwrap();
/// assert_eq!(after, before - 1);
///
/// system.shutdown().unwrap();
/// ```
pub struct AppSystem {
    registry: Registry,
}

impl AppSystem {
    /// Registers every component and runs the create phase.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let mut registry = Registry::with_config(config);
        components::register_all(&mut registry)?;
        registry.create()?;
        info!(components = ?registry.names(), "Components created");
        Ok(Self { registry })
    }

    /// Access to the registry between create and start, e.g. to install overrides.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs the assembly and setup phases.
    pub fn start(&mut self) -> Result<(), RegistryError> {
        info!("Starting system...");
        if let Err(err) = self.registry.assemble().and_then(|()| self.registry.setup()) {
            error!(error = %err, "System start failed");
            return Err(err);
        }
        info!("System started");
        Ok(())
    }

    pub fn service(&self) -> Result<Handle<OrderService>, RegistryError> {
        self.registry.lookup::<OrderService>(SERVICE)
    }

    /// Tears down everything that was set up.
    ///
    /// Safe after a failed [`AppSystem::start`]; components that never
    /// reached setup are skipped.
    pub fn shutdown(mut self) -> Result<(), RegistryError> {
        info!("Shutting down system...");
        self.registry.teardown()?;

        let torn_down = self
            .registry
            .snapshot()
            .values()
            .filter(|phase| **phase == Phase::TornDown)
            .count();
        info!(torn_down, "System shut down");
        Ok(())
    }
}
