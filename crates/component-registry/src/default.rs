//! # Default Registry
//!
//! A convenience registry for applications that only ever need one. It is
//! thread-local because the registry is single-threaded.
//!
//! Prefer an explicitly owned [`Registry`] wherever you can; tests in
//! particular should build their own.
//!
//! Components never need the default registry: every hook already receives
//! `&mut Registry`. Calling [`with_default`] from inside a hook that is
//! running on the default registry fails with [`RegistryError::Busy`].

use crate::error::RegistryError;
use crate::registry::Registry;
use std::cell::RefCell;

thread_local! {
    static DEFAULT_REGISTRY: RefCell<Registry> = RefCell::new(Registry::new());
}

/// Runs `f` with exclusive access to this thread's default registry.
pub fn with_default<R>(f: impl FnOnce(&mut Registry) -> R) -> Result<R, RegistryError> {
    DEFAULT_REGISTRY.with(|cell| {
        let mut registry = cell
            .try_borrow_mut()
            .map_err(|_| RegistryError::Busy("default registry".to_string()))?;
        Ok(f(&mut registry))
    })
}

/// Replaces this thread's default registry with a fresh, empty one.
pub fn reset_default() -> Result<(), RegistryError> {
    with_default(|registry| *registry = Registry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::phase::Phase;

    struct Named;

    impl Component for Named {
        fn name(&self) -> &str {
            "named"
        }
    }

    #[test]
    fn default_registry_persists_between_calls() {
        reset_default().unwrap();
        with_default(|registry| {
            registry.register(|| Named)?;
            registry.create()
        })
        .unwrap()
        .unwrap();

        let phase = with_default(|registry| registry.phase_of("named")).unwrap();
        assert_eq!(phase, Some(Phase::Created));

        reset_default().unwrap();
        assert!(with_default(|registry| registry.is_empty()).unwrap());
    }

    #[test]
    fn nested_access_is_busy() {
        let nested = with_default(|_| with_default(|_| ())).unwrap();
        assert!(matches!(nested, Err(RegistryError::Busy(_))));
    }
}
