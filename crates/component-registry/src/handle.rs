//! # Component Handles
//!
//! A [`Handle`] is a shared reference to a component owned by the registry,
//! tagged with the name it is registered under. Handles are what components
//! store during assembly and pass back to the ordering calls.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A shared, named reference to a registered component.
///
/// `C` is either a concrete component type (from [`Registry::lookup`](crate::Registry::lookup))
/// or `dyn Component` (from [`Registry::get`](crate::Registry::get)).
///
/// * **Cloneable** – holds two `Rc`s, so cloning is inexpensive.
/// * **Single-threaded** – the registry is synchronous; handles are `!Send`.
pub struct Handle<C: ?Sized> {
    name: Rc<str>,
    cell: Rc<RefCell<C>>,
}

impl<C: ?Sized> Handle<C> {
    pub(crate) fn new(name: Rc<str>, cell: Rc<RefCell<C>>) -> Self {
        Self { name, cell }
    }

    /// The name the component is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Immutably borrows the component.
    ///
    /// # Panics
    /// If the component is currently mutably borrowed, e.g. because its own
    /// lifecycle step is running further up the stack.
    pub fn borrow(&self) -> Ref<'_, C> {
        self.cell.borrow()
    }

    /// Mutably borrows the component.
    ///
    /// # Panics
    /// If the component is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, C> {
        self.cell.borrow_mut()
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq<D: ?Sized>(&self, other: &Handle<D>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.cell), Rc::as_ptr(&other.cell))
    }
}

impl<C: ?Sized> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<C: ?Sized> fmt::Debug for Handle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("name", &self.name).finish()
    }
}

impl<C: ?Sized> AsRef<str> for Handle<C> {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
