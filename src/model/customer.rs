//! A registered shopper and the cart they own.
//!
//! # Actor Framework
//! [`Customer`] implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! See [`impl ActorEntity for Customer`](#impl-ActorEntity-for-Customer) for details on:
//! - Creation parameters ([`CustomerCreate`])
//! - Update parameters ([`CustomerUpdate`])
//! - Cart actions ([`CustomerAction`](crate::customer_actor::CustomerAction))

use crate::model::Selection;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl From<u32> for CustomerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "customer_{}", self.0)
    }
}

/// Identifier of a cart line, unique within one customer's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartItemId(pub u32);

impl Display for CartItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cart_item_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub cart: Vec<CartItem>,
    next_cart_item: u32,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            cart: Vec::new(),
            next_cart_item: 1,
        }
    }

    pub fn cart_item(&self, id: CartItemId) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.id == id)
    }

    /// Appends a line and returns its new id. Ids are never reused within a cart.
    pub(crate) fn push_cart_item(&mut self, selection: Selection) -> CartItemId {
        let id = CartItemId(self.next_cart_item);
        self.next_cart_item += 1;
        self.cart.push(CartItem { id, selection });
        id
    }

    /// Name used in greetings and payment forms: the display name, or the e-mail local part.
    pub fn first_name(&self) -> &str {
        let name = self.name.split_whitespace().next().unwrap_or_default();
        if name.is_empty() {
            self.email.split('@').next().unwrap_or_default()
        } else {
            name
        }
    }
}

/// Payload for registering a customer.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
}

// DTOs for Customer updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}
