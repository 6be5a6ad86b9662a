//! Cart actions for the customer actor.
//!
//! The cart is owned one-to-one by its customer, so cart edits are actions on the
//! [`Customer`](crate::model::Customer) entity rather than a separate resource.

use crate::model::{CartItem, CartItemId, CatalogId, Selection};

#[derive(Debug, Clone)]
pub enum CustomerAction {
    /// Adds a line to the cart after shape validation.
    AddItem(Selection),
    /// Changes quantity, charms or message of an existing line. `None` leaves a field as is.
    UpdateItem {
        item_id: CartItemId,
        quantity: Option<u32>,
        charms: Option<Vec<CatalogId>>,
        message: Option<String>,
    },
    RemoveItem(CartItemId),
    /// Removes the listed lines and returns them. Fails without touching the cart if any id is
    /// unknown.
    ConsumeItems(Vec<CartItemId>),
    /// Puts previously consumed lines back, keeping their ids.
    RestoreItems(Vec<CartItem>),
}

/// Results from CustomerActions - variants match 1:1 with CustomerAction
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerActionResult {
    ItemAdded(CartItemId),
    ItemUpdated(CartItem),
    ItemRemoved,
    Consumed(Vec<CartItem>),
    Restored,
}
