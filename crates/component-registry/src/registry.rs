//! # Component Registry
//!
//! This module defines the [`Registry`], which owns every component and drives
//! them through their lifecycle. It is the "conductor" of the crate: factories
//! go in, named and wired components come out, and shutdown happens in an
//! order the components themselves declare.

use crate::component::Component;
use crate::config::{DuplicatePolicy, RegistryConfig};
use crate::error::RegistryError;
use crate::handle::Handle;
use crate::phase::{Phase, Step};
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

type Factory = Box<dyn FnOnce() -> (String, Slot)>;

/// A stored component, kept both as a trait object (to run its steps) and as
/// `dyn Any` over the same allocation (to narrow it back to its concrete type).
struct Slot {
    name: Rc<str>,
    component: Rc<RefCell<dyn Component>>,
    any: Rc<dyn Any>,
}

impl Slot {
    fn new<C: Component>(name: &str, component: C) -> Self {
        let cell = Rc::new(RefCell::new(component));
        Self {
            name: Rc::from(name),
            component: cell.clone(),
            any: cell,
        }
    }
}

/// Owns all components and drives them through Create → Assemble → Setup → Teardown.
///
/// # Usage Pattern
///
/// 1. **Register**: hand the registry a factory per component.
/// 2. **Create**: every factory runs once, in registration order.
/// 3. **Assemble**: components look each other up by name and store handles.
/// 4. **Setup**: components initialize, pulling their dependencies forward
///    with [`Registry::setup_after`].
/// 5. **Teardown**: components shut down, pushing dependents first with
///    [`Registry::teardown_after`].
///
/// ```rust
/// use component_registry::{BoxError, Component, Handle, Registry};
///
/// struct Store { open: bool }
/// impl Component for Store {
///     fn name(&self) -> &str { "storage.Store" }
///     fn setup(&mut self, _: &mut Registry) -> Result<(), BoxError> {
///         self.open = true;
///         Ok(())
///     }
/// }
///
/// struct Service { store: Option<Handle<Store>>, ready: bool }
/// impl Component for Service {
///     fn name(&self) -> &str { "app.Service" }
///     fn assemble(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
///         self.store = Some(registry.lookup::<Store>("storage.Store")?);
///         Ok(())
///     }
///     fn setup(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
///         let store = self.store.as_ref().ok_or("not assembled")?;
///         registry.setup_after(store)?;
///         self.ready = store.borrow().open;
///         Ok(())
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register(|| Service { store: None, ready: false }).unwrap();
/// registry.register(|| Store { open: false }).unwrap();
///
/// registry.create().unwrap();
/// registry.assemble().unwrap();
/// registry.setup().unwrap();
///
/// let service = registry.lookup::<Service>("app.Service").unwrap();
/// assert!(service.borrow().ready);
///
/// registry.teardown().unwrap();
/// ```
///
/// # Implementation Details
///
/// * **Phases** are tracked per component name and for the registry as a whole.
///   The registry-wide phase gates the entry points so they run in order.
/// * **Iteration** over components within a phase uses a `HashMap` and has no
///   defined order. Only declared dependencies order components.
/// * **Cycle detection** keeps one in-progress set per direction. A name is
///   inserted before its step (and its prerequisites) run and removed after
///   they return, so meeting it again on the way down is a cycle.
/// * **Errors** abort the current phase immediately. Components not yet
///   visited keep their phase, so a later [`Registry::teardown`] still cleans
///   up whatever did get set up.
pub struct Registry {
    config: RegistryConfig,
    factories: Vec<Factory>,
    // set once create() has run the factories, even if it then failed
    factories_run: bool,
    instances: HashMap<String, Slot>,
    phases: HashMap<String, Phase>,
    phase: Option<Phase>,
    // dependency -> prerequisites, in declaration order
    setup_before: HashMap<String, Vec<String>>,
    resolving_setup: HashSet<String>,
    resolving_teardown: HashSet<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            factories: Vec::new(),
            factories_run: false,
            instances: HashMap::new(),
            phases: HashMap::new(),
            phase: None,
            setup_before: HashMap::new(),
            resolving_setup: HashSet::new(),
            resolving_teardown: HashSet::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // --- Methods for the application driver ---

    /// Registers a component factory.
    ///
    /// Factories run during [`Registry::create`]. They must not assume any
    /// other component exists; relegate expensive work to setup.
    pub fn register<C, F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        C: Component,
        F: FnOnce() -> C + 'static,
    {
        if self.phase.is_some() || self.factories_run {
            return Err(RegistryError::PhaseOrder {
                operation: "register()",
                requirement: "components must be registered before create()",
            });
        }
        self.factories.push(Box::new(move || {
            let component = factory();
            let name = component.name().to_owned();
            let slot = Slot::new(&name, component);
            (name, slot)
        }));
        Ok(())
    }

    /// Runs every registered factory once, in registration order.
    ///
    /// Duplicate names are handled according to
    /// [`RegistryConfig::duplicate_names`]. With the default
    /// [`DuplicatePolicy::Reject`] no component is stored and the registry
    /// phase does not change. The factories have been consumed by then, so
    /// the registry is unusable: later `register`, `create` and phase calls
    /// fail with [`RegistryError::PhaseOrder`].
    pub fn create(&mut self) -> Result<(), RegistryError> {
        if self.phase.is_some() || self.factories_run {
            return Err(RegistryError::PhaseOrder {
                operation: "create()",
                requirement: "create() runs once, before assemble()",
            });
        }

        self.factories_run = true;
        let created: Vec<(String, Slot)> = self.factories.drain(..).map(|factory| factory()).collect();

        if self.config.duplicate_names == DuplicatePolicy::Reject {
            let mut seen = HashSet::new();
            for (name, _) in &created {
                if self.instances.contains_key(name) || !seen.insert(name.as_str()) {
                    warn!(component = %name, "Duplicate component name");
                    return Err(RegistryError::DuplicateName(name.clone()));
                }
            }
        }

        for (name, slot) in created {
            if self.instances.contains_key(&name) {
                warn!(component = %name, "Duplicate component name, replacing earlier registration");
            }
            debug!(component = %name, "Create");
            self.phases.insert(name.clone(), Phase::Created);
            self.instances.insert(name, slot);
        }

        self.phase = Some(Phase::Created);
        info!(phase = %Phase::Created, components = self.instances.len(), "Phase complete");
        Ok(())
    }

    /// Runs the assembly step of every component still in [`Phase::Created`].
    pub fn assemble(&mut self) -> Result<(), RegistryError> {
        self.expect_phase(Phase::Created, "assemble()", "assemble() comes after create()")?;
        self.lifecycle_step(Step::Assemble, |registry, name| {
            registry.run_step(name, Step::Assemble)
        })
    }

    /// Runs the setup step of every component still in [`Phase::Assembled`],
    /// honouring ordering rules and `setup_after` calls.
    pub fn setup(&mut self) -> Result<(), RegistryError> {
        self.expect_phase(Phase::Assembled, "setup()", "setup() comes after assemble()")?;
        self.lifecycle_step(Step::Setup, |registry, name| {
            registry.with_marker(Step::Setup, name, |registry| {
                registry.setup_with_prerequisites(name)
            })
        })?;
        self.setup_before.clear();
        Ok(())
    }

    /// Runs the teardown step of every component in [`Phase::SetUp`].
    ///
    /// There is no phase precondition: this is safe to call after a failed
    /// [`Registry::setup`] to release whatever did get set up.
    pub fn teardown(&mut self) -> Result<(), RegistryError> {
        self.lifecycle_step(Step::Teardown, |registry, name| {
            registry.with_marker(Step::Teardown, name, |registry| {
                registry.run_step(name, Step::Teardown)
            })
        })
    }

    // --- Methods for components ---

    /// Returns the component registered under `name`, if any.
    ///
    /// Safe at any phase. Callers must not use the component before it has
    /// reached the phase they need.
    pub fn get(&self, name: &str) -> Option<Handle<dyn Component>> {
        self.instances
            .get(name)
            .map(|slot| Handle::new(Rc::clone(&slot.name), Rc::clone(&slot.component)))
    }

    /// Looks up `name` and narrows it to the concrete component type `C`.
    pub fn lookup<C: Component>(&self, name: &str) -> Result<Handle<C>, RegistryError> {
        let slot = self
            .instances
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let cell = Rc::clone(&slot.any)
            .downcast::<RefCell<C>>()
            .map_err(|_| RegistryError::CapabilityMismatch {
                name: name.to_string(),
                expected: type_name::<C>(),
            })?;
        Ok(Handle::new(Rc::clone(&slot.name), cell))
    }

    /// Declares that `dependency`'s setup must not run before `prerequisite`'s.
    ///
    /// Only allowed while the registry is in [`Phase::Created`], i.e. from an
    /// assembly step. Neither component needs to be the caller.
    pub fn add_order_rule(
        &mut self,
        prerequisite: impl AsRef<str>,
        dependency: impl AsRef<str>,
    ) -> Result<(), RegistryError> {
        let (prerequisite, dependency) = (prerequisite.as_ref(), dependency.as_ref());
        self.expect_phase(
            Phase::Created,
            "add_order_rule()",
            "only allowed during assemble()",
        )?;
        for name in [prerequisite, dependency] {
            if !self.instances.contains_key(name) {
                return Err(RegistryError::InvalidArgument(format!(
                    "cannot add setup order rule for unknown component '{name}'"
                )));
            }
        }
        debug!(prerequisite, dependency, "Order rule added");
        self.setup_before
            .entry(dependency.to_string())
            .or_default()
            .push(prerequisite.to_string());
        Ok(())
    }

    /// Makes sure `other` is set up before the caller continues.
    ///
    /// Call it at the start of your setup step. Returns immediately if
    /// `other` is already set up (or was never assembled). Fails with
    /// [`RegistryError::CircularDependency`] if `other` is still being set up
    /// further up the call stack.
    pub fn setup_after(&mut self, other: impl AsRef<str>) -> Result<(), RegistryError> {
        let other = other.as_ref();
        self.expect_phase(
            Phase::Assembled,
            "setup_after()",
            "only allowed during setup()",
        )?;
        let phase = self.known_phase(other, "setup_after()")?;
        if self.resolving_setup.contains(other) {
            warn!(component = other, "Circular setup dependency");
            return Err(RegistryError::CircularDependency {
                step: Step::Setup,
                name: other.to_string(),
            });
        }
        if phase != Phase::Assembled {
            debug!(component = other, %phase, "setup_after satisfied");
            return Ok(());
        }

        debug!(component = other, "setup_after resolving");
        let result = self.with_marker(Step::Setup, other, |registry| {
            registry.setup_with_prerequisites(other)
        });
        // a failed dependency is not retried
        self.phases.insert(other.to_string(), Phase::SetUp);
        result.map_err(|err| RegistryError::attribute(other, Step::Setup, err))
    }

    /// Makes sure `other` is torn down before the caller continues.
    ///
    /// Mirrors [`Registry::setup_after`], without ordering rules and without a
    /// registry phase precondition.
    pub fn teardown_after(&mut self, other: impl AsRef<str>) -> Result<(), RegistryError> {
        let other = other.as_ref();
        let phase = self.known_phase(other, "teardown_after()")?;
        if self.resolving_teardown.contains(other) {
            warn!(component = other, "Circular teardown dependency");
            return Err(RegistryError::CircularDependency {
                step: Step::Teardown,
                name: other.to_string(),
            });
        }
        if phase != Phase::SetUp {
            debug!(component = other, %phase, "teardown_after satisfied");
            return Ok(());
        }

        debug!(component = other, "teardown_after resolving");
        let result = self.with_marker(Step::Teardown, other, |registry| {
            registry.run_step(other, Step::Teardown)
        });
        self.phases.insert(other.to_string(), Phase::TornDown);
        result
    }

    // --- Methods useful for testing ---

    /// Stores `component` under `name`, replacing any existing instance, in [`Phase::Created`].
    ///
    /// Call it after [`Registry::create`] and before [`Registry::assemble`].
    /// An override installed before `create` collides with a factory of the
    /// same name: it fails `create` with `DuplicateName` under the default
    /// policy, and is silently replaced under [`DuplicatePolicy::Replace`].
    /// Does not change the registry phase.
    pub fn create_override<C: Component>(&mut self, name: &str, component: C) {
        debug!(component = name, "Create override");
        self.instances
            .insert(name.to_string(), Slot::new(name, component));
        self.phases.insert(name.to_string(), Phase::Created);
    }

    /// Marks `name` as assembled so [`Registry::assemble`] skips it.
    pub fn skip_assemble(&mut self, name: &str) -> Result<(), RegistryError> {
        self.force_phase(name, Phase::Assembled)
    }

    /// Marks `name` as set up so [`Registry::setup`] skips it.
    pub fn skip_setup(&mut self, name: &str) -> Result<(), RegistryError> {
        self.force_phase(name, Phase::SetUp)
    }

    /// Marks `name` as torn down so [`Registry::teardown`] skips it.
    pub fn skip_teardown(&mut self, name: &str) -> Result<(), RegistryError> {
        self.force_phase(name, Phase::TornDown)
    }

    // --- Introspection ---

    /// The furthest phase the whole registry reached, `None` before create.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn phase_of(&self, name: &str) -> Option<Phase> {
        self.phases.get(name).copied()
    }

    /// Registered component names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Every component's current phase, keyed and sorted by name.
    pub fn snapshot(&self) -> BTreeMap<String, Phase> {
        self.phases
            .iter()
            .map(|(name, phase)| (name.clone(), *phase))
            .collect()
    }

    // --- Internals ---

    fn expect_phase(
        &self,
        expected: Phase,
        operation: &'static str,
        requirement: &'static str,
    ) -> Result<(), RegistryError> {
        if self.phase == Some(expected) {
            Ok(())
        } else {
            Err(RegistryError::PhaseOrder {
                operation,
                requirement,
            })
        }
    }

    fn known_phase(&self, name: &str, operation: &str) -> Result<Phase, RegistryError> {
        self.phase_of(name).ok_or_else(|| {
            RegistryError::InvalidArgument(format!(
                "{operation} called with unknown component '{name}'"
            ))
        })
    }

    fn force_phase(&mut self, name: &str, phase: Phase) -> Result<(), RegistryError> {
        let current = self
            .phases
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        debug!(component = name, %phase, "Phase forced");
        *current = phase;
        Ok(())
    }

    /// Runs `run` on every component sitting in `step`'s starting phase and
    /// advances each one that succeeds. Stops at the first failure.
    fn lifecycle_step(
        &mut self,
        step: Step,
        mut run: impl FnMut(&mut Self, &str) -> Result<(), RegistryError>,
    ) -> Result<(), RegistryError> {
        let names: Vec<String> = self.instances.keys().cloned().collect();
        for name in names {
            // earlier components may already have pulled this one forward
            if self.phase_of(&name) != Some(step.from_phase()) {
                continue;
            }
            if let Err(err) = run(self, &name) {
                warn!(component = %name, %step, error = %err, "Step failed");
                return Err(RegistryError::attribute(&name, step, err));
            }
            self.phases.insert(name, step.to_phase());
        }

        self.phase = Some(step.to_phase());
        info!(phase = %step.to_phase(), components = self.instances.len(), "Phase complete");
        Ok(())
    }

    fn setup_with_prerequisites(&mut self, name: &str) -> Result<(), RegistryError> {
        let prerequisites = self.setup_before.get(name).cloned().unwrap_or_default();
        for prerequisite in &prerequisites {
            debug!(component = name, prerequisite = %prerequisite, "Applying order rule");
            self.setup_after(prerequisite)?;
        }
        self.run_step(name, Step::Setup)
    }

    fn with_marker(
        &mut self,
        step: Step,
        name: &str,
        run: impl FnOnce(&mut Self) -> Result<(), RegistryError>,
    ) -> Result<(), RegistryError> {
        self.markers(step).insert(name.to_string());
        let result = run(self);
        self.markers(step).remove(name);
        result
    }

    fn markers(&mut self, step: Step) -> &mut HashSet<String> {
        match step {
            Step::Teardown => &mut self.resolving_teardown,
            Step::Assemble | Step::Setup => &mut self.resolving_setup,
        }
    }

    fn run_step(&mut self, name: &str, step: Step) -> Result<(), RegistryError> {
        let cell = match self.instances.get(name) {
            Some(slot) => Rc::clone(&slot.component),
            None => return Err(RegistryError::NotFound(name.to_string())),
        };
        let mut component = cell
            .try_borrow_mut()
            .map_err(|_| RegistryError::Busy(format!("component '{name}'")))?;

        debug!(component = name, %step, "Running step");
        let result = match step {
            Step::Assemble => component.assemble(self),
            Step::Setup => component.setup(self),
            Step::Teardown => component.teardown(self),
        };
        result.map_err(|source| RegistryError::Component {
            name: name.to_string(),
            step,
            source,
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("phase", &self.phase)
            .field("pending_factories", &self.factories.len())
            .field("factories_run", &self.factories_run)
            .field("components", &self.snapshot())
            .field("config", &self.config)
            .finish()
    }
}
