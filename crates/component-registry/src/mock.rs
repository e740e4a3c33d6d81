//! # Mock Components & Testing Guide
//!
//! `MockComponent` is a scriptable [`Component`] that records every hook it
//! runs into a shared [`Recorder`]. It lets you describe a dependency graph
//! in a few lines and then assert the order the registry drove it in.
//!
//! ## When to use Mocks vs Real Components
//!
//! | Feature | MockComponent | Real Component |
//! |---------|---------------|----------------|
//! | **Setup** | One builder chain | A struct plus a `Component` impl |
//! | **Ordering checks** | Built in via `Recorder` | Hand-rolled |
//! | **Typed lookups** | No (wires by name only) | Yes ([`Registry::lookup`]) |
//! | **Use Case** | Testing the registry's ordering | Testing your component |
//!
//! ## Example
//!
//! ```rust
//! use component_registry::mock::{MockComponent, Recorder};
//! use component_registry::Registry;
//!
//! let recorder = Recorder::new();
//! let mut registry = Registry::new();
//!
//! let db = MockComponent::new("db", &recorder);
//! let api = MockComponent::new("api", &recorder)
//!     .looks_up("db")
//!     .setup_after("db");
//!
//! registry.register(db.into_factory()).unwrap();
//! registry.register(api.into_factory()).unwrap();
//! registry.create().unwrap();
//! registry.assemble().unwrap();
//!
//! recorder.reset();
//! registry.setup().unwrap();
//! assert_eq!(recorder.filtered(".setup"), vec!["db.setup", "api.setup"]);
//! ```
//!
//! ## Unordered phases
//!
//! Components without declared dependencies run in no particular order. Use
//! [`assert_recorded_one_of`] to accept every legal permutation.
//!
//! ## Failure injection
//!
//! [`MockComponent::failing_on`] makes a hook return an error, which is the
//! easiest way to test partial setup followed by teardown.

use crate::component::Component;
use crate::error::{BoxError, RegistryError};
use crate::handle::Handle;
use crate::phase::Step;
use crate::registry::Registry;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared, append-only log of hook invocations.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Entries ending with `suffix`, in recorded order.
    pub fn filtered(&self, suffix: &str) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.ends_with(suffix))
            .cloned()
            .collect()
    }

    pub fn reset(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Asserts that the recording equals one of the `allowed` sequences.
///
/// # Panics
/// If none of them match; the message lists the actual and allowed sequences.
pub fn assert_recorded_one_of(recorder: &Recorder, allowed: &[&[&str]]) {
    let actual = recorder.entries();
    let matched = allowed
        .iter()
        .any(|candidate| candidate.iter().copied().eq(actual.iter().map(String::as_str)));
    assert!(
        matched,
        "recording did not match\n  actual : {actual:?}\n  allowed: {allowed:?}"
    );
}

/// A scriptable component that records `"<name>.<event>"` for every hook.
///
/// Events: `new`, `assemble`, `assemble_err`, `pre_setup`, `setup`,
/// `setup_err`, `pre_teardown`, `teardown`, `teardown_err`.
pub struct MockComponent {
    name: String,
    recorder: Recorder,
    lookups: Vec<String>,
    order_rules: Vec<(String, String)>,
    setup_after: Vec<String>,
    teardown_after: Vec<String>,
    fail_on: Option<Step>,
    wired: Vec<Handle<dyn Component>>,
}

impl MockComponent {
    pub fn new(name: impl Into<String>, recorder: &Recorder) -> Self {
        Self {
            name: name.into(),
            recorder: recorder.clone(),
            lookups: Vec::new(),
            order_rules: Vec::new(),
            setup_after: Vec::new(),
            teardown_after: Vec::new(),
            fail_on: None,
            wired: Vec::new(),
        }
    }

    /// Looks `other` up by name during assembly; a missing component fails assembly.
    pub fn looks_up(mut self, other: impl Into<String>) -> Self {
        self.lookups.push(other.into());
        self
    }

    /// Declares, during assembly, that `prerequisite` sets up before `dependency`.
    pub fn declares_order(
        mut self,
        prerequisite: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        self.order_rules.push((prerequisite.into(), dependency.into()));
        self
    }

    /// Calls [`Registry::setup_after`] on `other` at the start of setup.
    pub fn setup_after(mut self, other: impl Into<String>) -> Self {
        self.setup_after.push(other.into());
        self
    }

    /// Calls [`Registry::teardown_after`] on `other` at the start of teardown.
    pub fn teardown_after(mut self, other: impl Into<String>) -> Self {
        self.teardown_after.push(other.into());
        self
    }

    /// Makes the given hook fail after its ordering calls succeeded.
    pub fn failing_on(mut self, step: Step) -> Self {
        self.fail_on = Some(step);
        self
    }

    /// Turns the mock into a factory that records `"<name>.new"` when it runs.
    pub fn into_factory(self) -> impl FnOnce() -> MockComponent + 'static {
        move || {
            self.record("new");
            self
        }
    }

    /// Handles resolved during assembly, in lookup order.
    pub fn wired(&self) -> &[Handle<dyn Component>] {
        &self.wired
    }

    fn record(&self, event: &str) {
        self.recorder.add(format!("{}.{}", self.name, event));
    }

    fn injected_failure(&self, step: Step) -> Result<(), BoxError> {
        if self.fail_on == Some(step) {
            return Err(format!("{} failed during {}", self.name, step).into());
        }
        Ok(())
    }

    fn wire(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        for other in &self.lookups {
            let handle = registry
                .get(other)
                .ok_or_else(|| RegistryError::NotFound(other.clone()))?;
            self.wired.push(handle);
        }
        for (prerequisite, dependency) in &self.order_rules {
            registry.add_order_rule(prerequisite, dependency)?;
        }
        self.injected_failure(Step::Assemble)
    }

    /// Calls `call` for every target, then the injected failure check, recording the outcome.
    fn ordered(
        &self,
        step: Step,
        targets: &[String],
        registry: &mut Registry,
        call: fn(&mut Registry, &str) -> Result<(), RegistryError>,
    ) -> Result<(), BoxError> {
        let event = match step {
            Step::Teardown => "teardown",
            Step::Assemble | Step::Setup => "setup",
        };
        self.record(&format!("pre_{event}"));
        let outcome = targets
            .iter()
            .try_for_each(|target| call(registry, target).map_err(BoxError::from))
            .and_then(|()| self.injected_failure(step));
        match outcome {
            Ok(()) => {
                self.record(event);
                Ok(())
            }
            Err(err) => {
                self.record(&format!("{event}_err"));
                Err(err)
            }
        }
    }
}

impl Component for MockComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn assemble(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        self.record("assemble");
        let outcome = self.wire(registry);
        if outcome.is_err() {
            self.record("assemble_err");
        }
        outcome
    }

    fn setup(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        self.ordered(Step::Setup, &self.setup_after, registry, |registry, target| {
            registry.setup_after(target)
        })
    }

    fn teardown(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        self.ordered(Step::Teardown, &self.teardown_after, registry, |registry, target| {
            registry.teardown_after(target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_filters_by_suffix() {
        let recorder = Recorder::new();
        recorder.add("a.pre_setup");
        recorder.add("a.setup");
        recorder.add("b.setup_err");

        assert_eq!(recorder.filtered(".setup"), vec!["a.setup"]);
        recorder.reset();
        assert!(recorder.entries().is_empty());
    }

    #[test]
    fn assert_recorded_accepts_any_allowed_permutation() {
        let recorder = Recorder::new();
        recorder.add("b");
        recorder.add("a");
        assert_recorded_one_of(&recorder, &[&["a", "b"], &["b", "a"]]);
    }

    #[test]
    #[should_panic(expected = "recording did not match")]
    fn assert_recorded_rejects_other_orders() {
        let recorder = Recorder::new();
        recorder.add("a");
        assert_recorded_one_of(&recorder, &[&["b"]]);
    }

    #[test]
    fn factory_records_creation() {
        let recorder = Recorder::new();
        let factory = MockComponent::new("a", &recorder).into_factory();
        let mock = factory();

        assert_eq!(mock.name(), "a");
        assert_eq!(recorder.entries(), vec!["a.new"]);
    }
}
