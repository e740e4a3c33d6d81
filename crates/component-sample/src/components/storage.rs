//! In-memory product storage, seeded from the configuration during setup.

use super::{CACHE, CONFIG, STORE};
use crate::components::AppConfig;
use crate::error::InventoryError;
use crate::model::{Product, ProductId};
use component_registry::{BoxError, Component, Handle, Registry};
use std::collections::BTreeMap;
use tracing::{debug, info};

const CATALOG: [(&str, f64); 3] = [("Widget", 2.5), ("Gadget", 12.0), ("Gizmo", 7.25)];

#[derive(Debug, Default)]
pub struct ProductStore {
    config: Option<Handle<AppConfig>>,
    products: BTreeMap<ProductId, Product>,
    open: bool,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn get(&self, id: ProductId) -> Result<&Product, InventoryError> {
        if !self.open {
            return Err(InventoryError::NotReady(STORE));
        }
        self.products.get(&id).ok_or(InventoryError::NotFound(id))
    }

    /// Takes `quantity` out of stock and returns what is left.
    pub fn reserve(&mut self, id: ProductId, quantity: u32) -> Result<u32, InventoryError> {
        if !self.open {
            return Err(InventoryError::NotReady(STORE));
        }
        let product = self
            .products
            .get_mut(&id)
            .ok_or(InventoryError::NotFound(id))?;
        if product.quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available: product.quantity,
            });
        }
        product.quantity -= quantity;
        debug!(product_id = %id, remaining = product.quantity, "Stock reserved");
        Ok(product.quantity)
    }
}

impl Component for ProductStore {
    fn name(&self) -> &str {
        STORE
    }

    fn assemble(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        self.config = Some(registry.lookup::<AppConfig>(CONFIG)?);
        Ok(())
    }

    fn setup(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        let config = self.config.clone().ok_or(InventoryError::NotReady(CONFIG))?;
        registry.setup_after(&config)?;
        let stock = config.borrow().initial_stock()?;

        self.products = (1..)
            .zip(CATALOG)
            .map(|(id, (name, price))| {
                let id = ProductId(id);
                (id, Product::new(id, name, price, stock))
            })
            .collect();
        self.open = true;
        info!(products = self.products.len(), stock, "Product store opened");
        Ok(())
    }

    fn teardown(&mut self, registry: &mut Registry) -> Result<(), BoxError> {
        registry.teardown_after(CACHE)?;
        self.open = false;
        info!(products = self.products.len(), "Product store closed");
        Ok(())
    }
}
