//! # Component Registry
//!
//! This crate drives independently-written components through an ordered
//! lifecycle and lets them declare ordering dependencies on each other.
//!
//! ## The Lifecycle
//!
//! | Phase | Entry point | What components do |
//! |-------|-------------|--------------------|
//! | **Create** | [`Registry::create`] | Factories build bare instances |
//! | **Assemble** | [`Registry::assemble`] | Look each other up by name, store handles, declare order rules |
//! | **Setup** | [`Registry::setup`] | Pull dependencies forward with [`Registry::setup_after`], then initialize |
//! | **Teardown** | [`Registry::teardown`] | Push dependents out first with [`Registry::teardown_after`], then release |
//!
//! The application calls the four entry points in order; the registry rejects
//! anything out of sequence with [`RegistryError::PhaseOrder`].
//!
//! ## Ordering Without a Graph
//!
//! Nobody hands the registry a dependency graph. Each component states what
//! it needs at the moment it needs it:
//!
//! ```rust,ignore
//! fn setup(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
//!     registry.setup_after(&self.store)?;   // store is set up when this returns
//!     self.pool = self.store.borrow().pool();
//!     Ok(())
//! }
//! ```
//!
//! The registry resolves these requests depth-first. A component that is
//! still being set up further up the call stack is reported as a
//! [`RegistryError::CircularDependency`] rather than being entered twice.
//!
//! A component can also order two *other* components during assembly with
//! [`Registry::add_order_rule`]; the rule is applied before the dependent
//! component's own setup step runs.
//!
//! ## Single-Threaded by Design
//!
//! Everything here is synchronous. Components live in `Rc<RefCell<_>>`
//! handles and every hook receives `&mut Registry`. A multi-threaded wrapper
//! would have to serialize every registry call behind one lock.
//!
//! ## Testing
//!
//! The [`mock`] module provides a scriptable [`mock::MockComponent`] and a
//! [`mock::Recorder`] to assert the order hooks ran in.

pub mod component;
pub mod config;
pub mod default;
pub mod error;
pub mod handle;
pub mod mock;
pub mod phase;
pub mod registry;
pub mod tracing;

// Re-export core types for convenience
pub use component::Component;
pub use config::{DuplicatePolicy, RegistryConfig};
pub use default::{reset_default, with_default};
pub use error::{BoxError, RegistryError};
pub use handle::Handle;
pub use phase::{Phase, Step};
pub use registry::Registry;
