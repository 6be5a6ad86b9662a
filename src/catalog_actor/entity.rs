//! [`ActorEntity`] implementation for [`CatalogItem`]: the inventory ledger.

use super::actions::{CatalogAction, CatalogActionResult};
use super::error::CatalogError;
use crate::model::{CatalogCreate, CatalogId, CatalogItem, CatalogUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn check_price(price: Decimal) -> Result<(), CatalogError> {
    if price.is_sign_negative() {
        return Err(CatalogError::ValidationError(format!(
            "price must not be negative, got {price}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for CatalogItem {
    type Id = CatalogId;
    type Create = CatalogCreate;
    type Update = CatalogUpdate;
    type Action = CatalogAction;
    type ActionResult = CatalogActionResult;
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: CatalogId, params: CatalogCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(CatalogError::ValidationError("name is required".into()));
        }
        check_price(params.price)?;
        Ok(Self::new(id, params))
    }

    async fn on_update(&mut self, update: CatalogUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(price) = update.price {
            check_price(price)?;
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        Ok(())
    }

    /// # Actions
    /// - `CheckStock`: returns the stock level
    /// - `Reserve`: decrements stock (never below zero), bumps `sold`, returns the unit price
    /// - `Release`: the inverse of `Reserve`
    async fn handle_action(
        &mut self,
        action: CatalogAction,
        _ctx: &(),
    ) -> Result<CatalogActionResult, Self::Error> {
        match action {
            CatalogAction::CheckStock => Ok(CatalogActionResult::CheckStock(self.stock)),
            CatalogAction::Reserve {
                kind,
                quantity,
                with_charms,
            } => {
                if self.kind != kind {
                    return Err(CatalogError::NotFound(format!("{kind} {}", self.id)));
                }
                if quantity == 0 {
                    return Err(CatalogError::InvalidQuantity(quantity));
                }
                if with_charms && !self.accepts_charms() {
                    return Err(CatalogError::CharmsNotAllowed(self.name.clone()));
                }
                if self.stock < quantity {
                    return Err(CatalogError::InsufficientStock {
                        item: self.name.clone(),
                        requested: quantity,
                        available: self.stock,
                    });
                }
                self.stock -= quantity;
                self.sold = self.sold.saturating_add(quantity);
                Ok(CatalogActionResult::Reserved(self.price))
            }
            CatalogAction::Release { quantity } => {
                self.stock = self.stock.saturating_add(quantity);
                self.sold = self.sold.saturating_sub(quantity);
                Ok(CatalogActionResult::Released)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogKind, ProductCategory};
    use rust_decimal_macros::dec;

    fn necklace(stock: u32) -> CatalogItem {
        CatalogItem::from_create_params(
            CatalogId(1),
            CatalogCreate::product("Luna Necklace", ProductCategory::Necklace, dec!(100), stock),
        )
        .unwrap()
    }

    fn reserve(kind: CatalogKind, quantity: u32) -> CatalogAction {
        CatalogAction::Reserve {
            kind,
            quantity,
            with_charms: false,
        }
    }

    #[tokio::test]
    async fn test_reserve_decrements_stock_and_counts_sold() {
        let mut item = necklace(5);
        let result = item
            .handle_action(reserve(CatalogKind::Product, 2), &())
            .await
            .unwrap();
        assert_eq!(result, CatalogActionResult::Reserved(dec!(100)));
        assert_eq!((item.stock, item.sold), (3, 2));
    }

    #[tokio::test]
    async fn test_reserve_never_goes_negative() {
        let mut item = necklace(1);
        let err = item
            .handle_action(reserve(CatalogKind::Product, 2), &())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_reserve_checks_kind_and_quantity() {
        let mut item = necklace(5);
        assert!(matches!(
            item.handle_action(reserve(CatalogKind::Charm, 1), &()).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            item.handle_action(reserve(CatalogKind::Product, 0), &()).await,
            Err(CatalogError::InvalidQuantity(0))
        ));
    }

    #[tokio::test]
    async fn test_only_chains_accept_charms() {
        let mut ring = CatalogItem::from_create_params(
            CatalogId(2),
            CatalogCreate::product("Sol Ring", ProductCategory::Ring, dec!(80), 5),
        )
        .unwrap();
        let with_charms = CatalogAction::Reserve {
            kind: CatalogKind::Product,
            quantity: 1,
            with_charms: true,
        };
        assert!(matches!(
            ring.handle_action(with_charms.clone(), &()).await,
            Err(CatalogError::CharmsNotAllowed(_))
        ));
        assert!(necklace(5).handle_action(with_charms, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_release_restores_stock() {
        let mut item = necklace(5);
        item.handle_action(reserve(CatalogKind::Product, 4), &())
            .await
            .unwrap();
        item.handle_action(CatalogAction::Release { quantity: 4 }, &())
            .await
            .unwrap();
        assert_eq!((item.stock, item.sold), (5, 0));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let result = CatalogItem::from_create_params(
            CatalogId(3),
            CatalogCreate::charm("Star", dec!(-1), 10),
        );
        assert!(matches!(result, Err(CatalogError::ValidationError(_))));
    }
}
