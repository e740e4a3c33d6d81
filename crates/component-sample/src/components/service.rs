//! The order-facing entry point of the application.

use super::{CACHE, SERVICE, STORE};
use crate::components::{ProductStore, StockCache};
use crate::error::InventoryError;
use crate::model::ProductId;
use component_registry::{BoxError, Component, Handle, Registry};
use tracing::info;

#[derive(Debug, Default)]
pub struct OrderService {
    store: Option<Handle<ProductStore>>,
    cache: Option<Handle<StockCache>>,
    ready: bool,
    reservations: u32,
}

impl OrderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn reservations(&self) -> u32 {
        self.reservations
    }

    /// Reserves stock in the store and refreshes the cached level.
    pub fn reserve(&mut self, id: ProductId, quantity: u32) -> Result<u32, InventoryError> {
        if !self.ready {
            return Err(InventoryError::NotReady(SERVICE));
        }
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        let (store, cache) = self.wired()?;
        let remaining = store.borrow_mut().reserve(id, quantity)?;
        cache.borrow_mut().update(id, remaining);
        self.reservations += 1;
        info!(product_id = %id, quantity, remaining, "Order placed");
        Ok(remaining)
    }

    /// Stock level as seen by the cache.
    pub fn stock(&self, id: ProductId) -> Result<u32, InventoryError> {
        let (_, cache) = self.wired()?;
        cache.borrow().stock(id)
    }

    fn wired(&self) -> Result<(&Handle<ProductStore>, &Handle<StockCache>), InventoryError> {
        match (&self.store, &self.cache) {
            (Some(store), Some(cache)) => Ok((store, cache)),
            _ => Err(InventoryError::NotReady(SERVICE)),
        }
    }
}

impl Component for OrderService {
    fn name(&self) -> &str {
        SERVICE
    }

    fn assemble(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        self.store = Some(registry.lookup::<ProductStore>(STORE)?);
        self.cache = Some(registry.lookup::<StockCache>(CACHE)?);
        Ok(())
    }

    fn setup(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        registry.setup_after(CACHE)?;
        self.ready = true;
        Ok(())
    }

    fn teardown(&mut self, _registry: &mut Registry) -> Result<(), BoxError> {
        self.ready = false;
        info!(reservations = self.reservations, "Order service stopped");
        Ok(())
    }
}
