//! Error types for the customer actor.

use crate::model::SelectionError;
use thiserror::Error;

/// Errors that can occur during customer and cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),

    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// The cart line has an invalid shape.
    #[error("Invalid cart item: {0}")]
    InvalidCartItem(#[from] SelectionError),

    #[error("Customer validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
