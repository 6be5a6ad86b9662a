//! Periodic carrier polling that moves shipped orders through fulfillment.

use super::mapping::StatusMapping;
use crate::carrier::CarrierClient;
use crate::clients::OrderClient;
use crate::config::TrackingSettings;
use crate::model::{FulfillmentStatus, Order, OrderId};
use crate::order_actor::OrderError;
use actor_framework::ActorClient;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Counts from one synchronization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Orders the carrier was asked about.
    pub examined: usize,
    pub updated: usize,
    /// Carrier or order-actor failures; each is isolated to its order.
    pub failed: usize,
    /// Terminal orders with a tracking code, left untouched.
    pub skipped: usize,
}

enum OrderSync {
    Updated,
    Unchanged,
    Failed,
}

/// Orders worth polling: a tracking code is attached and the order has left `awaiting_shipment`.
fn is_candidate(order: &Order) -> bool {
    order.billcode().is_some() && order.fulfillment_status != FulfillmentStatus::AwaitingShipment
}

#[derive(Clone)]
pub struct TrackingSynchronizer {
    orders: OrderClient,
    carrier: Arc<dyn CarrierClient>,
    mapping: StatusMapping,
    settings: TrackingSettings,
}

impl TrackingSynchronizer {
    pub fn new(orders: OrderClient, carrier: Arc<dyn CarrierClient>, settings: TrackingSettings) -> Self {
        Self {
            orders,
            carrier,
            mapping: StatusMapping::default(),
            settings,
        }
    }

    pub fn with_mapping(mut self, mapping: StatusMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Polls the carrier once for every candidate order.
    #[instrument(skip(self))]
    pub async fn sync_tracking(&self) -> Result<SyncReport, OrderError> {
        let (terminal, active): (Vec<Order>, Vec<Order>) = self
            .orders
            .list()
            .await?
            .into_iter()
            .filter(is_candidate)
            .partition(|order| order.fulfillment_status.is_terminal());

        let mut report = SyncReport {
            examined: active.len(),
            skipped: terminal.len(),
            ..SyncReport::default()
        };

        let outcomes: Vec<OrderSync> = stream::iter(active)
            .map(|order| self.sync_order(order))
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                OrderSync::Updated => report.updated += 1,
                OrderSync::Failed => report.failed += 1,
                OrderSync::Unchanged => {}
            }
        }

        info!(
            examined = report.examined,
            updated = report.updated,
            failed = report.failed,
            skipped = report.skipped,
            "Tracking sync finished"
        );
        Ok(report)
    }

    async fn sync_order(&self, order: Order) -> OrderSync {
        let Some(billcode) = order.billcode() else {
            return OrderSync::Unchanged;
        };

        let response = match tokio::time::timeout(
            self.settings.request_timeout,
            self.carrier.track(billcode),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(order = %order.id, billcode, error = %e, "Tracking request failed");
                return OrderSync::Failed;
            }
            Err(_) => {
                warn!(order = %order.id, billcode, "Tracking request timed out");
                return OrderSync::Failed;
            }
        };

        let Some(latest) = response.latest_status() else {
            debug!(order = %order.id, billcode, "No tracking history yet");
            return OrderSync::Unchanged;
        };
        let Some(status) = self.mapping.map(latest) else {
            debug!(order = %order.id, latest, "Unmapped carrier status");
            return OrderSync::Unchanged;
        };
        if status == order.fulfillment_status {
            return OrderSync::Unchanged;
        }

        self.apply(order.id, status).await
    }

    async fn apply(&self, id: OrderId, status: FulfillmentStatus) -> OrderSync {
        match self.orders.apply_tracking(id, status).await {
            Ok(outcome) if outcome.changed() => OrderSync::Updated,
            Ok(_) => OrderSync::Unchanged,
            Err(e) => {
                warn!(order = %id, error = %e, "Could not apply tracking status");
                OrderSync::Failed
            }
        }
    }

    /// Runs `sync_tracking` on every tick of the configured interval until `shutdown` fires.
    ///
    /// A zero interval is refused with an error log and the loop never starts.
    pub async fn run(self, shutdown: CancellationToken) {
        if self.settings.interval.is_zero() {
            error!("Tracking interval must be non-zero; tracking loop not started");
            return;
        }
        let mut interval = tokio::time::interval(self.settings.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(interval_secs = self.settings.interval.as_secs(), "Tracking loop started");

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("Tracking loop stopped");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sync_tracking().await {
                        error!(error = %e, "Tracking sync aborted");
                    }
                }
            }
        }
    }
}
