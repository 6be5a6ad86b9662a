//! Inventory-bearing catalog entries: products, bundles (gift sets) and charms.
//!
//! # Actor Framework
//! [`CatalogItem`] implements [`ActorEntity`](actor_framework::ActorEntity) in
//! [`crate::catalog_actor`]. One actor holds every kind, so a single transaction can reserve a
//! product together with the charms attached to it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogId(pub u32);

impl From<u32> for CatalogId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Product,
    /// A fixed-price gift set or monthly special.
    Bundle,
    /// A decorative add-on attached to a line.
    Charm,
}

impl CatalogKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Bundle => "bundle",
            Self::Charm => "charm",
        }
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Necklace,
    Bracelet,
    Earring,
    Ring,
    Other,
}

impl ProductCategory {
    /// Only chains can carry charms.
    pub const fn accepts_charms(&self) -> bool {
        matches!(self, Self::Necklace | Self::Bracelet)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub kind: CatalogKind,
    pub name: String,
    /// Set for products only.
    pub category: Option<ProductCategory>,
    pub price: Decimal,
    pub stock: u32,
    /// Cumulative units sold.
    pub sold: u32,
}

impl CatalogItem {
    pub fn new(id: CatalogId, params: CatalogCreate) -> Self {
        Self {
            id,
            kind: params.kind,
            name: params.name,
            category: params.category,
            price: params.price,
            stock: params.stock,
            sold: 0,
        }
    }

    pub fn accepts_charms(&self) -> bool {
        self.kind == CatalogKind::Product && self.category.is_some_and(|c| c.accepts_charms())
    }
}

/// Payload for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct CatalogCreate {
    pub name: String,
    pub kind: CatalogKind,
    pub category: Option<ProductCategory>,
    pub price: Decimal,
    pub stock: u32,
}

impl CatalogCreate {
    pub fn product(
        name: impl Into<String>,
        category: ProductCategory,
        price: Decimal,
        stock: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind: CatalogKind::Product,
            category: Some(category),
            price,
            stock,
        }
    }

    pub fn bundle(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            kind: CatalogKind::Bundle,
            category: None,
            price,
            stock,
        }
    }

    pub fn charm(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            kind: CatalogKind::Charm,
            category: None,
            price,
            stock,
        }
    }
}

// DTOs for catalog updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
}
