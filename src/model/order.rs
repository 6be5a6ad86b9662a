//! A priced, persisted purchase and the lines it owns.
//!
//! # Actor Framework
//! [`Order`] implements [`ActorEntity`](actor_framework::ActorEntity) in
//! [`crate::order_actor`]; its `on_create` hook is the order builder.

use crate::model::{
    CatalogId, CustomerId, FulfillmentStatus, PaymentStatus, SelectionSource,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// One unit of a charm attached to a line, priced when the order was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemAddOn {
    /// `None` once the charm has been removed from the catalog.
    pub charm_id: Option<CatalogId>,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: Option<CatalogId>,
    pub bundle: Option<CatalogId>,
    pub quantity: u32,
    pub message: Option<String>,
    /// Base unit price at build time; zero for a charms-only line.
    pub unit_price: Decimal,
    pub add_ons: Vec<LineItemAddOn>,
}

impl LineItem {
    /// `unit_price × quantity` plus each add-on once. Add-ons are not multiplied by quantity.
    ///
    /// `None` when the amount does not fit in a `Decimal`.
    pub fn contribution(&self) -> Option<Decimal> {
        let base = self.unit_price.checked_mul(Decimal::from(self.quantity))?;
        self.add_ons
            .iter()
            .try_fold(base, |sum, add_on| sum.checked_add(add_on.unit_price))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub total_price: Decimal,
    pub shipping_address: String,
    pub shipping_cost: Decimal,
    /// Carrier tracking code; unique across orders once assigned.
    pub billcode: Option<String>,
    /// Present exactly when the status is `not_accepted`.
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    /// Where the lines come from; taken by the builder and always `None` once stored.
    #[serde(skip)]
    pub(crate) pending_source: Option<SelectionSource>,
}

impl Order {
    /// A fresh, empty order: payment pending, awaiting shipment, total 0.
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id: params.customer_id,
            payment_status: PaymentStatus::Pending,
            fulfillment_status: FulfillmentStatus::AwaitingShipment,
            total_price: Decimal::ZERO,
            shipping_address: params.shipping_address,
            shipping_cost: params.shipping_cost,
            billcode: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            pending_source: Some(params.source),
        }
    }

    /// Sum of every line's contribution. Equals `total_price` for any stored order.
    pub fn computed_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.contribution()?))
    }

    /// Amount charged to the customer: goods plus shipping.
    pub fn gross_amount(&self) -> Decimal {
        self.total_price + self.shipping_cost
    }

    pub fn billcode(&self) -> Option<&str> {
        self.billcode.as_deref().filter(|code| !code.trim().is_empty())
    }
}

/// Payload for building a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: CustomerId,
    pub shipping_address: String,
    pub shipping_cost: Decimal,
    pub source: SelectionSource,
}

// DTOs for Order updates. Rejected once the order is terminal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub shipping_address: Option<String>,
    pub shipping_cost: Option<Decimal>,
}
