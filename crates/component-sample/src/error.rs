//! Error types for the sample components.

use crate::model::ProductId;
use thiserror::Error;

/// Errors returned by the inventory components.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// A configuration value could not be parsed.
    #[error("Invalid configuration for {key}: '{value}'")]
    Config { key: &'static str, value: String },

    /// The component was used before the registry set it up, or after teardown.
    #[error("{0} is not ready")]
    NotReady(&'static str),
}
