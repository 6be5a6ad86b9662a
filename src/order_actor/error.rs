//! Error types for the order actor.

use crate::catalog_actor::CatalogError;
use crate::customer_actor::CustomerError;
use crate::model::{SelectionError, UnknownStatus};
use thiserror::Error;

/// Errors that can occur while building or operating on orders.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Bad input shape or values: empty selection, zero quantity, invalid line.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// A referenced order, customer, cart item or catalog entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("A rejection reason is required for status not_accepted")]
    MissingReason,

    /// The carrier or payment integration failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Another order already uses this billcode.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    /// Message safe to show a shopper. Internal failures collapse to a generic text.
    pub fn public_message(&self) -> String {
        match self {
            Self::ActorCommunicationError(_) => {
                "Something went wrong while processing your order. Please try again.".to_string()
            }
            Self::ExternalService(_) => {
                "A partner service is unavailable right now. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Stable machine-readable kind for API responses.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InvalidStatus(_) => "invalid_status",
            Self::MissingReason => "missing_reason",
            Self::ExternalService(_) => "external_service_error",
            Self::Conflict(_) => "conflict",
            Self::ActorCommunicationError(_) => "internal_error",
        }
    }
}

impl From<SelectionError> for OrderError {
    fn from(e: SelectionError) -> Self {
        OrderError::Validation(e.to_string())
    }
}

impl From<UnknownStatus> for OrderError {
    fn from(e: UnknownStatus) -> Self {
        OrderError::InvalidStatus(e.0)
    }
}

impl From<CatalogError> for OrderError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(what) => OrderError::NotFound(what),
            CatalogError::InsufficientStock {
                item,
                requested,
                available,
            } => OrderError::InsufficientStock {
                item,
                requested,
                available,
            },
            CatalogError::InvalidQuantity(_)
            | CatalogError::CharmsNotAllowed(_)
            | CatalogError::ValidationError(_) => OrderError::Validation(e.to_string()),
            CatalogError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}

impl From<CustomerError> for OrderError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::NotFound(what) => OrderError::NotFound(what),
            CustomerError::CartItemNotFound(what) => OrderError::NotFound(what),
            CustomerError::InvalidCartItem(inner) => inner.into(),
            CustomerError::ValidationError(msg) => OrderError::Validation(msg),
            CustomerError::ActorCommunicationError(msg) => {
                OrderError::ActorCommunicationError(msg)
            }
        }
    }
}
