//! A read cache of stock levels, warmed from the store.
//!
//! The cache never calls `setup_after` itself. It declares during assembly
//! that the store must be set up first, which the registry applies whenever
//! the cache's setup is reached.

use super::{CACHE, SERVICE, STORE};
use crate::components::ProductStore;
use crate::error::InventoryError;
use crate::model::ProductId;
use component_registry::{BoxError, Component, Handle, Registry};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Default)]
pub struct StockCache {
    store: Option<Handle<ProductStore>>,
    levels: HashMap<ProductId, u32>,
    warm: bool,
}

impl StockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_warm(&self) -> bool {
        self.warm
    }

    pub fn stock(&self, id: ProductId) -> Result<u32, InventoryError> {
        if !self.warm {
            return Err(InventoryError::NotReady(CACHE));
        }
        self.levels.get(&id).copied().ok_or(InventoryError::NotFound(id))
    }

    pub fn update(&mut self, id: ProductId, quantity: u32) {
        self.levels.insert(id, quantity);
    }
}

impl Component for StockCache {
    fn name(&self) -> &str {
        CACHE
    }

    fn assemble(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        let store = registry.lookup::<ProductStore>(STORE)?;
        registry.add_order_rule(&store, CACHE)?;
        self.store = Some(store);
        Ok(())
    }

    fn setup(&mut self, _registry: &mut Registry) -> Result<(), BoxError> {
        let store = self.store.as_ref().ok_or(InventoryError::NotReady(STORE))?;
        let store = store.borrow();
        if !store.is_open() {
            return Err(InventoryError::NotReady(STORE).into());
        }
        self.levels = store
            .products()
            .map(|product| (product.id, product.quantity))
            .collect();
        self.warm = true;
        info!(entries = self.levels.len(), "Stock cache warmed");
        Ok(())
    }

    fn teardown(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        registry.teardown_after(SERVICE)?;
        self.levels.clear();
        self.warm = false;
        info!("Stock cache cleared");
        Ok(())
    }
}
