//! # Inventory Components
//!
//! Four components that only know each other by name:
//!
//! | Name | Type | Depends on |
//! |------|------|------------|
//! | `app.Config` | [`AppConfig`] | nothing |
//! | `storage.ProductStore` | [`ProductStore`] | config (`setup_after`) |
//! | `cache.StockCache` | [`StockCache`] | store (order rule declared during assembly) |
//! | `app.OrderService` | [`OrderService`] | cache (`setup_after`), store |
//!
//! Teardown runs the other way round: the store waits for the cache, which
//! waits for the service.

pub mod cache;
pub mod config;
pub mod service;
pub mod storage;

pub use cache::StockCache;
pub use config::AppConfig;
pub use service::OrderService;
pub use storage::ProductStore;

use component_registry::{Registry, RegistryError};

pub const CONFIG: &str = "app.Config";
pub const STORE: &str = "storage.ProductStore";
pub const CACHE: &str = "cache.StockCache";
pub const SERVICE: &str = "app.OrderService";

/// Registers a factory for every inventory component.
pub fn register_all(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(OrderService::new)?;
    registry.register(StockCache::new)?;
    registry.register(ProductStore::new)?;
    registry.register(AppConfig::from_env)?;
    Ok(())
}
