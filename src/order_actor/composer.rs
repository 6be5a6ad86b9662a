//! Turns a [`Selection`] into stock reservations and, once those are priced, into a [`LineItem`].
//!
//! Planning and composing are split so that every line of an order can be reserved in one
//! catalog transaction before any line is built.

use super::error::OrderError;
use crate::clients::Reservation;
use crate::model::{CatalogKind, LineItem, LineItemAddOn, Selection};
use rust_decimal::Decimal;

/// Reservations a line needs, base first, then one single-unit reservation per charm.
pub fn reservations_for(selection: &Selection) -> Result<Vec<Reservation>, OrderError> {
    selection.validate()?;

    let with_charms = !selection.charms.is_empty();
    let base = match (selection.product, selection.bundle) {
        (Some(product), None) => Some(
            Reservation::new(product, CatalogKind::Product, selection.quantity)
                .with_charms(with_charms),
        ),
        (None, Some(bundle)) => Some(Reservation::new(
            bundle,
            CatalogKind::Bundle,
            selection.quantity,
        )),
        _ => None,
    };

    Ok(base
        .into_iter()
        .chain(
            selection
                .charms
                .iter()
                .map(|&charm| Reservation::new(charm, CatalogKind::Charm, 1)),
        )
        .collect())
}

/// Builds the line from the unit prices returned for `reservations_for(selection)`, in order.
pub fn compose(selection: &Selection, prices: &[Decimal]) -> Result<LineItem, OrderError> {
    let base_count = usize::from(selection.has_base());
    if prices.len() != base_count + selection.charms.len() {
        return Err(OrderError::ActorCommunicationError(format!(
            "expected {} prices for line, got {}",
            base_count + selection.charms.len(),
            prices.len()
        )));
    }

    let (base_prices, charm_prices) = prices.split_at(base_count);
    let unit_price = base_prices.first().copied().unwrap_or(Decimal::ZERO);
    let add_ons = selection
        .charms
        .iter()
        .zip(charm_prices)
        .map(|(&charm, &unit_price)| LineItemAddOn {
            charm_id: Some(charm),
            unit_price,
        })
        .collect();

    Ok(LineItem {
        product: selection.product,
        bundle: selection.bundle,
        quantity: selection.quantity,
        message: selection.message.clone(),
        unit_price,
        add_ons,
    })
}
