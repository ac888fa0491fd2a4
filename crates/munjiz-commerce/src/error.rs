//! Commerce error types.

use crate::checkout::OrderError;
use thiserror::Error;

/// Errors that can occur in cart and order operations.
///
/// Cart mutations and total calculations never fail; these errors come from
/// configuration loading, order submission and order editing.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Order line index out of range.
    #[error("Order line not found: {0}")]
    LineNotFound(usize),

    /// An order must keep at least one line.
    #[error("Cannot remove the last line of an order")]
    LastOrderLine,

    /// Tried to build an order from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// An order must have at least one item.
    #[error("Order must have at least one item")]
    EmptyOrder,

    /// The order-submission collaborator failed.
    #[error("Order submission failed: {0}")]
    OrderSubmission(#[from] OrderError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error.
    #[error("Cache error: {0}")]
    CacheError(#[from] munjiz_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
