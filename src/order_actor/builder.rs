//! The order builder: resolves a checkout's lines, reserves their stock in one transaction,
//! consumes the cart lines they came from and prices the order.
//!
//! Runs inside the order actor's `on_create` hook. Any error aborts the create, so the order is
//! never stored, and every reservation made so far is released before the error is returned.

use super::composer;
use super::entity::OrderContext;
use super::error::OrderError;
use crate::clients::Reservation;
use crate::model::{
    CartItem, CartItemId, Customer, CustomerId, Order, Selection, SelectionSource,
};
use actor_framework::ActorClient;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Lines to build and the cart items they consume.
struct ResolvedSource {
    selections: Vec<Selection>,
    consumed: Vec<CartItemId>,
}

fn resolve_source(customer: &Customer, source: SelectionSource) -> Result<ResolvedSource, OrderError> {
    match source {
        SelectionSource::Cart => {
            if customer.cart.is_empty() {
                return Err(OrderError::Validation("cart is empty".into()));
            }
            Ok(ResolvedSource {
                selections: customer.cart.iter().map(|i| i.selection.clone()).collect(),
                consumed: customer.cart.iter().map(|i| i.id).collect(),
            })
        }
        SelectionSource::Selective(ids) => {
            if ids.is_empty() {
                return Err(OrderError::Validation("no cart items selected".into()));
            }
            let mut seen = HashSet::new();
            let mut resolved = ResolvedSource {
                selections: Vec::new(),
                consumed: Vec::new(),
            };
            for id in ids.into_iter().filter(|id| seen.insert(*id)) {
                let item = customer
                    .cart_item(id)
                    .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
                resolved.selections.push(item.selection.clone());
                resolved.consumed.push(id);
            }
            Ok(resolved)
        }
        SelectionSource::Direct(selections) => {
            if selections.is_empty() {
                return Err(OrderError::Validation("no items selected".into()));
            }
            Ok(ResolvedSource {
                selections,
                consumed: Vec::new(),
            })
        }
    }
}

/// Fails when a consumed cart line no longer holds the selection that was reserved for it.
fn check_unchanged(resolved: &ResolvedSource, consumed: &[CartItem]) -> Result<(), OrderError> {
    for item in consumed {
        let reserved = resolved
            .consumed
            .iter()
            .position(|id| *id == item.id)
            .map(|at| &resolved.selections[at]);
        if reserved != Some(&item.selection) {
            return Err(OrderError::Validation(format!(
                "{} changed during checkout, please retry",
                item.id
            )));
        }
    }
    Ok(())
}

async fn load_customer(ctx: &OrderContext, id: CustomerId) -> Result<Customer, OrderError> {
    ctx.customers
        .get(id)
        .await?
        .ok_or_else(|| OrderError::NotFound(id.to_string()))
}

async fn release(ctx: &OrderContext, reservations: &[Reservation]) {
    if let Err(e) = ctx.catalog.release_all(reservations).await {
        warn!(error = %e, "Failed to release reserved stock");
    }
}

/// Fills `order.items` and `order.total_price` from the order's pending selection source.
pub async fn build(order: &mut Order, ctx: &OrderContext) -> Result<(), OrderError> {
    let source = order
        .pending_source
        .take()
        .ok_or_else(|| OrderError::Validation("order has no selection".into()))?;

    let customer = load_customer(ctx, order.customer_id).await?;
    let resolved = resolve_source(&customer, source)?;

    let mut reservations = Vec::new();
    let mut spans = Vec::with_capacity(resolved.selections.len());
    for selection in &resolved.selections {
        let planned = composer::reservations_for(selection)?;
        spans.push(reservations.len()..reservations.len() + planned.len());
        reservations.extend(planned);
    }

    debug!(order = %order.id, count = reservations.len(), "Reserving stock");
    let prices = ctx.catalog.reserve_all(&reservations).await?;

    let mut consumed = Vec::new();
    if !resolved.consumed.is_empty() {
        match ctx
            .customers
            .consume_items(order.customer_id, resolved.consumed.clone())
            .await
        {
            Ok(items) => consumed = items,
            Err(e) => {
                release(ctx, &reservations).await;
                return Err(e.into());
            }
        }
    }

    let priced = check_unchanged(&resolved, &consumed).and_then(|()| {
        resolved
            .selections
            .iter()
            .zip(spans)
            .map(|(selection, span)| composer::compose(selection, &prices[span]))
            .collect::<Result<Vec<_>, _>>()
    });
    let total = priced.and_then(|items| {
        order.items = items;
        order
            .computed_total()
            .filter(|total| total.checked_add(order.shipping_cost).is_some())
            .ok_or_else(|| OrderError::Validation("order total is out of range".into()))
    });
    match total {
        Ok(total) => order.total_price = total,
        Err(e) => {
            order.items.clear();
            release(ctx, &reservations).await;
            if !consumed.is_empty() {
                if let Err(restore) = ctx.customers.restore_items(order.customer_id, consumed).await {
                    warn!(error = %restore, "Failed to restore cart items");
                }
            }
            return Err(e);
        }
    }

    info!(
        order = %order.id,
        lines = order.items.len(),
        total = %order.total_price,
        "Order built"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogId;

    fn customer_with_cart(lines: usize) -> Customer {
        let mut customer = Customer::new(CustomerId(1), "Ayu", "ayu@example.com");
        for n in 0..lines {
            customer.cart.push(CartItem {
                id: CartItemId(n as u32 + 1),
                selection: Selection::product(CatalogId(1), 1),
            });
        }
        customer
    }

    #[test]
    fn test_empty_cart_is_a_validation_error() {
        let result = resolve_source(&customer_with_cart(0), SelectionSource::Cart);
        assert!(matches!(result, Err(OrderError::Validation(m)) if m == "cart is empty"));
    }

    #[test]
    fn test_selective_dedupes_and_rejects_unknown_ids() {
        let customer = customer_with_cart(2);
        let resolved = resolve_source(
            &customer,
            SelectionSource::Selective(vec![CartItemId(2), CartItemId(2)]),
        )
        .unwrap();
        assert_eq!(resolved.consumed, vec![CartItemId(2)]);

        let result = resolve_source(&customer, SelectionSource::Selective(vec![CartItemId(9)]));
        assert!(matches!(result, Err(OrderError::NotFound(_))));

        let result = resolve_source(&customer, SelectionSource::Selective(vec![]));
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_cart_line_edited_after_snapshot_is_detected() {
        let customer = customer_with_cart(2);
        let resolved = resolve_source(&customer, SelectionSource::Cart).unwrap();
        assert!(check_unchanged(&resolved, &customer.cart).is_ok());

        let mut edited = customer.cart.clone();
        edited[1].selection = Selection::product(CatalogId(1), 3);
        let result = check_unchanged(&resolved, &edited);
        assert!(matches!(result, Err(OrderError::Validation(m)) if m.contains("changed")));

        let mut swapped = customer.cart.clone();
        swapped[0].id = CartItemId(7);
        assert!(check_unchanged(&resolved, &swapped).is_err());
    }

    #[test]
    fn test_direct_selections_consume_nothing() {
        let resolved = resolve_source(
            &customer_with_cart(1),
            SelectionSource::Direct(vec![Selection::bundle(CatalogId(3), 1)]),
        )
        .unwrap();
        assert!(resolved.consumed.is_empty());
        assert_eq!(resolved.selections.len(), 1);
    }
}
