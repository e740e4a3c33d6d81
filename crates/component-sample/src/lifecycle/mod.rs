//! # System Lifecycle & Orchestration
//!
//! Individual components are simple; **booting them in the right order** is
//! where the complexity lives. This module owns the [`Registry`](component_registry::Registry)
//! and drives it from the outside.
//!
//! ## The AppSystem Pattern
//!
//! ```rust,ignore
//! let mut system = AppSystem::new(RegistryConfig::from_env()?)?;   // register + create
//! system.start()?;                                                  // assemble + setup
//!
//! let service = system.service()?;
//! service.borrow_mut().reserve(ProductId(1), 3)?;
//!
//! system.shutdown()?;                                               // teardown
//! ```
//!
//! Nothing here knows the dependency graph. Each component declares its own
//! ordering (`setup_after`, `teardown_after`, order rules) and the registry
//! resolves it.
//!
//! ## Partial Boots
//!
//! If [`AppSystem::start`] fails, some components may already be set up.
//! [`AppSystem::shutdown`] is still the right call: teardown only visits
//! components that reached setup.
//!
//! ## Observability
//!
//! Logging goes through `tracing`; install the subscriber with
//! [`component_registry::tracing::setup_tracing`] before building the system.
//!
//! ```bash
//! RUST_LOG=info cargo run -p component-sample
//! RUST_LOG=debug SAMPLE_INITIAL_STOCK=25 cargo run -p component-sample
//! ```

pub mod app_system;

pub use app_system::*;
