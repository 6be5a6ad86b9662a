//! [`ActorEntity`] implementation for [`Order`]: the builder on create and the fulfillment state
//! machine as actions.

use super::actions::{OrderAction, OrderActionResult, TransitionOutcome};
use super::builder;
use super::error::OrderError;
use crate::clients::{CatalogClient, CustomerClient};
use crate::model::{FulfillmentStatus, Order, OrderCreate, OrderId, OrderUpdate};
use crate::notify::{self, NotificationHooks};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Dependencies the order actor needs, injected through `run(ctx)`.
#[derive(Clone)]
pub struct OrderContext {
    pub customers: CustomerClient,
    pub catalog: CatalogClient,
    pub hooks: Arc<dyn NotificationHooks>,
}

fn check_shipping(address: &str, cost: Decimal) -> Result<(), OrderError> {
    if address.trim().is_empty() {
        return Err(OrderError::Validation("shipping address is required".into()));
    }
    if cost.is_sign_negative() {
        return Err(OrderError::Validation(format!(
            "shipping cost cannot be negative: {cost}"
        )));
    }
    Ok(())
}

impl Order {
    /// Moves the order to `status`. Repeating the current status changes nothing.
    fn transition(
        &mut self,
        status: FulfillmentStatus,
        reason: Option<String>,
    ) -> Result<TransitionOutcome, OrderError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let rejection_reason = match status {
            FulfillmentStatus::NotAccepted => Some(reason.ok_or(OrderError::MissingReason)?),
            _ => None,
        };

        let outcome = TransitionOutcome {
            from: self.fulfillment_status,
            to: status,
        };
        if outcome.changed() || self.rejection_reason != rejection_reason {
            self.fulfillment_status = status;
            self.rejection_reason = rejection_reason;
            self.updated_at = Utc::now();
        }
        Ok(outcome)
    }

    fn unchanged(&self) -> TransitionOutcome {
        TransitionOutcome {
            from: self.fulfillment_status,
            to: self.fulfillment_status,
        }
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        check_shipping(&params.shipping_address, params.shipping_cost)?;
        Ok(Self::new(id, params))
    }

    fn unique_key(&self) -> Option<String> {
        self.billcode().map(str::to_string)
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        builder::build(self, ctx).await
    }

    fn on_committed(&self, ctx: &OrderContext) {
        notify::spawn_order_created(&ctx.hooks, self);
    }

    fn on_action_committed(&self, result: &OrderActionResult, ctx: &OrderContext) {
        if let OrderActionResult::Transitioned(outcome) = result {
            if outcome.changed() {
                info!(order = %self.id, from = %outcome.from, to = %outcome.to, "Status changed");
                notify::spawn_status_changed(&ctx.hooks, self, outcome.from, outcome.to);
            }
        }
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &OrderContext) -> Result<(), Self::Error> {
        if self.fulfillment_status.is_terminal() {
            return Err(OrderError::Validation(format!(
                "{} is {} and can no longer be changed",
                self.id, self.fulfillment_status
            )));
        }
        let address = update
            .shipping_address
            .unwrap_or_else(|| self.shipping_address.clone());
        let cost = update.shipping_cost.unwrap_or(self.shipping_cost);
        check_shipping(&address, cost)?;
        if self.total_price.checked_add(cost).is_none() {
            return Err(OrderError::Validation(format!(
                "shipping cost {cost} is out of range"
            )));
        }
        self.shipping_address = address;
        self.shipping_cost = cost;
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn on_delete(&self, _ctx: &OrderContext) -> Result<(), Self::Error> {
        Err(OrderError::Validation("orders are never deleted".into()))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &OrderContext,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::Transition { status, reason } => self
                .transition(status, reason)
                .map(OrderActionResult::Transitioned),
            OrderAction::ApplyTracking(status) => {
                if self.fulfillment_status.is_terminal() {
                    return Ok(OrderActionResult::Transitioned(self.unchanged()));
                }
                self.transition(status, None)
                    .map(OrderActionResult::Transitioned)
            }
            OrderAction::AdvanceToCollection => {
                if !self.fulfillment_status.awaits_collection() {
                    return Ok(OrderActionResult::Transitioned(self.unchanged()));
                }
                self.transition(FulfillmentStatus::Collection, None)
                    .map(OrderActionResult::Transitioned)
            }
            OrderAction::AssignBillcode(code) => {
                let code = code.trim();
                if code.is_empty() {
                    return Err(OrderError::Validation("billcode cannot be empty".into()));
                }
                self.billcode = Some(code.to_string());
                self.updated_at = Utc::now();
                Ok(OrderActionResult::BillcodeAssigned)
            }
            OrderAction::SetPaymentStatus(status) => {
                if self.payment_status != status {
                    self.payment_status = status;
                    self.updated_at = Utc::now();
                }
                Ok(OrderActionResult::PaymentStatusSet)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, SelectionSource};
    use crate::notify::LoggingHooks;
    use actor_framework::mock::create_mock_client;
    use rust_decimal_macros::dec;

    fn context() -> OrderContext {
        let (customers, _) = create_mock_client(1);
        let (catalog, _) = create_mock_client(1);
        OrderContext {
            customers: CustomerClient::new(customers),
            catalog: CatalogClient::new(catalog),
            hooks: Arc::new(LoggingHooks),
        }
    }

    fn order() -> Order {
        Order::from_create_params(
            OrderId(1),
            OrderCreate {
                customer_id: CustomerId(1),
                shipping_address: "Jl. Melati 3, Bekasi".into(),
                shipping_cost: dec!(12000),
                source: SelectionSource::Cart,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_order_awaits_shipment_with_zero_total() {
        let o = order();
        assert_eq!(o.fulfillment_status, FulfillmentStatus::AwaitingShipment);
        assert_eq!(o.total_price, Decimal::ZERO);
        assert!(o.items.is_empty());
    }

    #[test]
    fn test_negative_shipping_cost_is_rejected() {
        let result = Order::from_create_params(
            OrderId(1),
            OrderCreate {
                customer_id: CustomerId(1),
                shipping_address: "Jl. Melati 3".into(),
                shipping_cost: dec!(-1),
                source: SelectionSource::Cart,
            },
        );
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_shipping_cost_edit_cannot_overflow_gross_amount() {
        let mut o = order();
        o.total_price = dec!(100);
        let update = OrderUpdate {
            shipping_address: None,
            shipping_cost: Some(Decimal::MAX),
        };
        let result = o.on_update(update, &context()).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
        assert_eq!(o.shipping_cost, dec!(12000));
        assert_eq!(o.gross_amount(), dec!(12100));
    }

    #[test]
    fn test_not_accepted_requires_a_reason() {
        let mut o = order();
        assert_eq!(
            o.transition(FulfillmentStatus::NotAccepted, Some("   ".into())),
            Err(OrderError::MissingReason)
        );
        assert_eq!(o.fulfillment_status, FulfillmentStatus::AwaitingShipment);
    }

    #[test]
    fn test_reason_is_cleared_when_leaving_not_accepted() {
        let mut o = order();
        o.transition(FulfillmentStatus::NotAccepted, Some(" out of stock ".into()))
            .unwrap();
        assert_eq!(o.rejection_reason.as_deref(), Some("out of stock"));

        let outcome = o.transition(FulfillmentStatus::Packing, None).unwrap();
        assert!(outcome.changed());
        assert_eq!(o.rejection_reason, None);
    }

    #[test]
    fn test_repeated_transition_is_a_no_op() {
        let mut o = order();
        o.transition(FulfillmentStatus::Shipped, None).unwrap();
        let stamp = o.updated_at;
        let outcome = o.transition(FulfillmentStatus::Shipped, None).unwrap();
        assert!(!outcome.changed());
        assert_eq!(o.updated_at, stamp);
    }

    #[tokio::test]
    async fn test_terminal_orders_ignore_tracking() {
        let mut o = order();
        o.fulfillment_status = FulfillmentStatus::Done;
        let ctx = context();
        let result = o
            .handle_action(
                OrderAction::ApplyTracking(FulfillmentStatus::Packing),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(
            result,
            OrderActionResult::Transitioned(TransitionOutcome {
                from: FulfillmentStatus::Done,
                to: FulfillmentStatus::Done,
            })
        );
        assert_eq!(o.fulfillment_status, FulfillmentStatus::Done);
    }

    #[tokio::test]
    async fn test_blank_billcode_is_rejected() {
        let mut o = order();
        let ctx = context();
        let result = o
            .handle_action(OrderAction::AssignBillcode(" ".into()), &ctx)
            .await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
        assert_eq!(o.unique_key(), None);

        o.handle_action(OrderAction::AssignBillcode("JX0042".into()), &ctx)
            .await
            .unwrap();
        assert_eq!(o.unique_key().as_deref(), Some("JX0042"));
    }
}
