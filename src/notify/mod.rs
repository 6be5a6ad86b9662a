//! # Notification Hooks
//!
//! Side effects that follow a committed order: confirmation and cancellation notices, review
//! token issuance. Hooks are spawned by the order actor after the change is in the store and
//! run on their own tasks. A failing hook is logged and never affects the order.

pub mod review;

pub use review::*;

use crate::model::{FulfillmentStatus, Order};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("{failed} of {total} notification hooks failed")]
    Fanout { failed: usize, total: usize },
}

/// Receiver of order events. Both methods default to doing nothing.
#[async_trait]
pub trait NotificationHooks: Send + Sync {
    async fn on_order_created(&self, _order: &Order) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn on_status_changed(
        &self,
        _order: &Order,
        _from: FulfillmentStatus,
        _to: FulfillmentStatus,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Writes each event to the log: an order confirmation on create, a cancellation notice when an
/// order is rejected or cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHooks;

#[async_trait]
impl NotificationHooks for LoggingHooks {
    async fn on_order_created(&self, order: &Order) -> Result<(), NotifyError> {
        info!(
            order = %order.id,
            customer = %order.customer_id,
            total = %order.total_price,
            address = %order.shipping_address,
            "Order confirmation"
        );
        Ok(())
    }

    async fn on_status_changed(
        &self,
        order: &Order,
        from: FulfillmentStatus,
        to: FulfillmentStatus,
    ) -> Result<(), NotifyError> {
        match to {
            FulfillmentStatus::NotAccepted | FulfillmentStatus::Cancelled => info!(
                order = %order.id,
                customer = %order.customer_id,
                status = %to,
                reason = order.rejection_reason.as_deref().unwrap_or("-"),
                "Cancellation notice"
            ),
            _ => info!(order = %order.id, %from, %to, "Status update"),
        }
        Ok(())
    }
}

/// Runs several hooks in order. Every hook runs even when an earlier one fails.
#[derive(Clone, Default)]
pub struct HookFanout {
    hooks: Vec<Arc<dyn NotificationHooks>>,
}

impl HookFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn NotificationHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    fn summarize(&self, failed: usize) -> Result<(), NotifyError> {
        match failed {
            0 => Ok(()),
            failed => Err(NotifyError::Fanout {
                failed,
                total: self.hooks.len(),
            }),
        }
    }
}

#[async_trait]
impl NotificationHooks for HookFanout {
    async fn on_order_created(&self, order: &Order) -> Result<(), NotifyError> {
        let mut failed = 0;
        for hooks in &self.hooks {
            if let Err(e) = hooks.on_order_created(order).await {
                warn!(order = %order.id, error = %e, "Hook failed");
                failed += 1;
            }
        }
        self.summarize(failed)
    }

    async fn on_status_changed(
        &self,
        order: &Order,
        from: FulfillmentStatus,
        to: FulfillmentStatus,
    ) -> Result<(), NotifyError> {
        let mut failed = 0;
        for hooks in &self.hooks {
            if let Err(e) = hooks.on_status_changed(order, from, to).await {
                warn!(order = %order.id, error = %e, "Hook failed");
                failed += 1;
            }
        }
        self.summarize(failed)
    }
}

/// Runs `on_order_created` on a new task.
pub fn spawn_order_created(hooks: &Arc<dyn NotificationHooks>, order: &Order) {
    let hooks = hooks.clone();
    let order = order.clone();
    tokio::spawn(async move {
        if let Err(e) = hooks.on_order_created(&order).await {
            warn!(order = %order.id, error = %e, "on_order_created hook failed");
        }
    });
}

/// Runs `on_status_changed` on a new task.
pub fn spawn_status_changed(
    hooks: &Arc<dyn NotificationHooks>,
    order: &Order,
    from: FulfillmentStatus,
    to: FulfillmentStatus,
) {
    let hooks = hooks.clone();
    let order = order.clone();
    tokio::spawn(async move {
        if let Err(e) = hooks.on_status_changed(&order, from, to).await {
            warn!(order = %order.id, error = %e, "on_status_changed hook failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, OrderCreate, OrderId, SelectionSource};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing;

    #[async_trait]
    impl NotificationHooks for Failing {
        async fn on_order_created(&self, _order: &Order) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("smtp unreachable".into()))
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl NotificationHooks for Counting {
        async fn on_order_created(&self, _order: &Order) -> Result<(), NotifyError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn order() -> Order {
        Order::new(
            OrderId(1),
            OrderCreate {
                customer_id: CustomerId(1),
                shipping_address: "Jl. Melati 3".into(),
                shipping_cost: Decimal::ZERO,
                source: SelectionSource::Cart,
            },
        )
    }

    #[tokio::test]
    async fn test_fanout_runs_every_hook_despite_failures() {
        let counting = Arc::new(Counting::default());
        let fanout = HookFanout::new()
            .with(Arc::new(Failing))
            .with(counting.clone())
            .with(Arc::new(LoggingHooks));

        let result = fanout.on_order_created(&order()).await;
        assert!(matches!(
            result,
            Err(NotifyError::Fanout {
                failed: 1,
                total: 3
            })
        ));
        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
    }
}
