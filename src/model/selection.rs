//! What a shopper picked for one order line, and where a checkout takes its lines from.

use crate::model::{CartItemId, CatalogId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on charm units attached to one line.
pub const MAX_CHARMS_PER_LINE: usize = 5;

/// One line's worth of choices: an optional base (product or bundle), a quantity, and the charm
/// units to attach. A selection with no base and only charms is a charms-only line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub product: Option<CatalogId>,
    pub bundle: Option<CatalogId>,
    pub quantity: u32,
    /// One entry per physical unit; the same charm may appear more than once.
    #[serde(default)]
    pub charms: Vec<CatalogId>,
    pub message: Option<String>,
}

impl Selection {
    pub fn product(id: CatalogId, quantity: u32) -> Self {
        Self {
            product: Some(id),
            bundle: None,
            quantity,
            charms: Vec::new(),
            message: None,
        }
    }

    pub fn bundle(id: CatalogId, quantity: u32) -> Self {
        Self {
            product: None,
            bundle: Some(id),
            quantity,
            charms: Vec::new(),
            message: None,
        }
    }

    pub fn charms_only(charms: Vec<CatalogId>) -> Self {
        Self {
            product: None,
            bundle: None,
            quantity: 1,
            charms,
            message: None,
        }
    }

    pub fn with_charms(mut self, charms: Vec<CatalogId>) -> Self {
        self.charms = charms;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn has_base(&self) -> bool {
        self.product.is_some() || self.bundle.is_some()
    }

    /// Shape checks that need no catalog lookup.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.quantity == 0 {
            return Err(SelectionError::ZeroQuantity);
        }
        if self.product.is_some() && self.bundle.is_some() {
            return Err(SelectionError::ProductAndBundle);
        }
        if self.bundle.is_some() && !self.charms.is_empty() {
            return Err(SelectionError::CharmsOnBundle);
        }
        if self.charms.len() > MAX_CHARMS_PER_LINE {
            return Err(SelectionError::TooManyCharms(self.charms.len()));
        }
        if !self.has_base() && self.charms.is_empty() {
            return Err(SelectionError::EmptyLine);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("a line cannot hold both a product and a bundle")]
    ProductAndBundle,
    #[error("charms cannot be attached to a bundle")]
    CharmsOnBundle,
    #[error("at most {MAX_CHARMS_PER_LINE} charms per line, got {0}")]
    TooManyCharms(usize),
    #[error("empty line: no product, bundle or charms selected")]
    EmptyLine,
}

/// Where checkout reads its lines from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "origin", content = "items")]
pub enum SelectionSource {
    /// Every item in the customer's cart.
    Cart,
    /// The listed cart items only.
    Selective(Vec<CartItemId>),
    /// Ad-hoc selections that never touched the cart ("buy now").
    Direct(Vec<Selection>),
}
