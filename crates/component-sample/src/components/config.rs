//! Application settings, parsed during setup so a bad value fails the boot
//! with a component error instead of a panic in a factory.

use super::CONFIG;
use crate::error::InventoryError;
use component_registry::{BoxError, Component, Registry};
use tracing::info;

/// Environment variable holding the stock level every product starts with.
pub const STOCK_ENV: &str = "SAMPLE_INITIAL_STOCK";
pub const DEFAULT_STOCK: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    raw_stock: Option<String>,
    initial_stock: u32,
    loaded: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_raw(std::env::var(STOCK_ENV).ok())
    }

    /// Uses `raw_stock` as if it had been read from [`STOCK_ENV`].
    pub fn from_raw(raw_stock: Option<String>) -> Self {
        Self {
            raw_stock,
            initial_stock: DEFAULT_STOCK,
            loaded: false,
        }
    }

    pub fn initial_stock(&self) -> Result<u32, InventoryError> {
        if !self.loaded {
            return Err(InventoryError::NotReady(CONFIG));
        }
        Ok(self.initial_stock)
    }
}

impl Component for AppConfig {
    fn name(&self) -> &str {
        CONFIG
    }

    fn setup(&mut self, _registry: &mut Registry) -> Result<(), BoxError> {
        if let Some(raw) = &self.raw_stock {
            self.initial_stock = raw.trim().parse().map_err(|_| InventoryError::Config {
                key: STOCK_ENV,
                value: raw.clone(),
            })?;
        }
        self.loaded = true;
        info!(initial_stock = self.initial_stock, "Configuration loaded");
        Ok(())
    }
}
