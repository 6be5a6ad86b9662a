//! # Payment Tokens
//!
//! A payment token lets the storefront redirect the shopper to the payment page. Tokens are
//! requested after an order is stored; failing to get one never undoes the order.

pub mod midtrans;

pub use midtrans::*;

use crate::model::{Customer, Order, OrderId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment request failed: {0}")]
    Http(String),

    #[error("Payment gateway returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Could not decode payment response: {0}")]
    Decode(String),

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Payment client misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PaymentError::Decode(e.to_string())
        } else {
            PaymentError::Http(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub gross_amount: Decimal,
    pub first_name: String,
    pub email: String,
    pub shipping_address: String,
}

impl PaymentRequest {
    /// Charges the order's goods plus shipping to `customer`.
    pub fn for_order(order: &Order, customer: &Customer) -> Self {
        Self {
            order_id: order.id,
            gross_amount: order.gross_amount(),
            first_name: customer.first_name().to_string(),
            email: customer.email.clone(),
            shipping_address: order.shipping_address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken {
    pub token: String,
    pub redirect_url: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_token(&self, request: &PaymentRequest) -> Result<PaymentToken, PaymentError>;
}
