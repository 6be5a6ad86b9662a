//! Custom actions for the catalog actor.
//!
//! These are the inventory ledger operations on a [`CatalogItem`](crate::model::CatalogItem).
//! Checkout runs its `Reserve` actions as one transaction through
//! [`CatalogClient::reserve_all`](crate::clients::CatalogClient::reserve_all).

use crate::model::CatalogKind;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Takes `quantity` units out of stock and returns the unit price.
    ///
    /// `kind` must match the entry (a charm id cannot be reserved as a product). Set
    /// `with_charms` when the line attaches charms, so products that cannot carry them are
    /// rejected inside the same transaction.
    Reserve {
        kind: CatalogKind,
        quantity: u32,
        with_charms: bool,
    },
    /// Puts units back after a reservation whose checkout was abandoned.
    Release { quantity: u32 },
}

/// Results from CatalogActions - variants match 1:1 with CatalogAction
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogActionResult {
    CheckStock(u32),
    Reserved(Decimal),
    Released,
}
