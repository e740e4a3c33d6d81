//! # Component Trait
//!
//! The `Component` trait defines the contract every unit managed by the
//! [`Registry`] must implement. A component has a unique name and three
//! lifecycle hooks, each of which receives the registry so the component can
//! coordinate with its peers.
//!
//! # Provided Methods (Hooks)
//! All three hooks have default implementations that do nothing (`Ok(())`):
//! - [`Component::assemble`]
//! - [`Component::setup`]
//! - [`Component::teardown`]
//!
//! You only implement the ones your component needs.

use crate::error::BoxError;
use crate::registry::Registry;
use std::any::Any;

/// Trait that any component must implement to be managed by the [`Registry`].
///
/// # Phases
/// 1. **Create**: the registered factory builds the instance. It must not
///    assume any other component exists.
/// 2. **Assemble**: look up the components you depend on with
///    [`Registry::lookup`] and store the handles. Do **not** call into them
///    yet, they may not be assembled. Ordering rules about other components go
///    here too ([`Registry::add_order_rule`]).
/// 3. **Setup**: call [`Registry::setup_after`] for each component you need
///    ready, then do your own initialization. When `setup_after` returns `Ok`
///    the other component is set up.
/// 4. **Teardown**: call [`Registry::teardown_after`] for each component that
///    must go away before you, then release your own resources.
///
/// A circular `setup_after` chain is reported as
/// [`RegistryError::CircularDependency`](crate::RegistryError::CircularDependency).
/// Break it by moving part of the work into the assembly phase.
pub trait Component: Any {
    /// The unique name this component is stored under.
    ///
    /// Convention is `<module>.<Interface>`, optionally followed by a
    /// disambiguating suffix.
    fn name(&self) -> &str;

    /// Called during the assembly phase.
    fn assemble(&mut self, _registry: &mut Registry) -> Result<(), BoxError> {
        Ok(())
    }

    /// Called during the setup phase, at most once.
    fn setup(&mut self, _registry: &mut Registry) -> Result<(), BoxError> {
        Ok(())
    }

    /// Called during the teardown phase, only if setup was reached.
    fn teardown(&mut self, _registry: &mut Registry) -> Result<(), BoxError> {
        Ok(())
    }
}
