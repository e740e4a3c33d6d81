//! # Registry Errors
//!
//! This module defines the error type returned by every fallible registry
//! operation. Component steps report their own failures as [`BoxError`]; the
//! registry wraps them in [`RegistryError::Component`] together with the
//! component name and the step that failed, so the source chain is preserved.

use crate::phase::Step;
use std::error::Error;

/// Error type returned by component steps.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors that can occur while driving components through their lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A phase-transition entry point (or an ordering call) was used out of sequence.
    #[error("wrong registry phase for {operation}: {requirement}")]
    PhaseOrder {
        operation: &'static str,
        requirement: &'static str,
    },

    /// A component transitively depends on its own unfinished resolution.
    #[error("circular {step} dependency involving component '{name}'")]
    CircularDependency { step: Step, name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two factories produced components with the same name.
    #[error("duplicate component name '{0}'")]
    DuplicateName(String),

    #[error("component '{0}' not found")]
    NotFound(String),

    /// A typed lookup found a component of a different type.
    #[error("component '{name}' is not a {expected}")]
    CapabilityMismatch { name: String, expected: &'static str },

    /// The component (or the default registry) is already borrowed.
    #[error("{0} is already borrowed")]
    Busy(String),

    /// A component's own assembly, setup or teardown step failed.
    #[error("error during {step} of component '{name}': {source}")]
    Component {
        name: String,
        step: Step,
        #[source]
        source: BoxError,
    },
}

impl RegistryError {
    /// Wraps `err` as a failure of `name`'s `step`, unless it already is one.
    pub(crate) fn attribute(name: &str, step: Step, err: RegistryError) -> RegistryError {
        if let RegistryError::Component { name: failed, .. } = &err {
            if failed == name {
                return err;
            }
        }
        RegistryError::Component {
            name: name.to_string(),
            step,
            source: Box::new(err),
        }
    }

    /// Walks the source chain and returns the component at which a cycle was detected.
    pub fn circular_dependency(&self) -> Option<&str> {
        let mut current: Option<&(dyn Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(RegistryError::CircularDependency { name, .. }) =
                err.downcast_ref::<RegistryError>()
            {
                return Some(name);
            }
            current = err.source();
        }
        None
    }

    /// Returns `true` for [`RegistryError::PhaseOrder`].
    pub fn is_phase_order(&self) -> bool {
        matches!(self, RegistryError::PhaseOrder { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_dependency_is_found_through_wrapping() {
        let cycle = RegistryError::CircularDependency {
            step: Step::Setup,
            name: "b".into(),
        };
        let inner = RegistryError::attribute("b", Step::Setup, cycle);
        let outer = RegistryError::attribute("a", Step::Setup, inner);

        assert_eq!(outer.circular_dependency(), Some("b"));
        assert!(outer.to_string().contains("component 'a'"));
    }

    #[test]
    fn attribute_does_not_wrap_twice_for_same_component() {
        let err = RegistryError::Component {
            name: "a".into(),
            step: Step::Setup,
            source: "boom".into(),
        };
        let err = RegistryError::attribute("a", Step::Setup, err);

        match err {
            RegistryError::Component { name, source, .. } => {
                assert_eq!(name, "a");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn plain_errors_have_no_cycle() {
        assert_eq!(RegistryError::NotFound("x".into()).circular_dependency(), None);
    }
}
