//! # Order Client
//!
//! High-level API for the order actor: checkout and the fulfillment operations.
use crate::model::{
    FulfillmentStatus, Order, OrderCreate, OrderId, OrderUpdate, PaymentStatus,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, TransitionOutcome};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected order result: {result:?}"))
}

/// Client for interacting with the order actor.
///
/// Order construction (customer lookup, stock reservation, pricing) happens in the order
/// actor's `on_create` hook; this client only sends requests and maps errors.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(FrameworkError::Conflict(key)) => {
                OrderError::Conflict(format!("billcode {key} is already assigned"))
            }
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    async fn fetch(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, params), fields(customer = %params.customer_id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(source = ?params.source, "Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Builds and stores an order, returning it as persisted.
    pub async fn build_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        let id = self.create_order(params).await?;
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Moves an order to the status named by `status` (its wire name, e.g. `"not_accepted"`).
    #[instrument(skip(self))]
    pub async fn transition_order(
        &self,
        id: OrderId,
        status: &str,
        reason: Option<String>,
    ) -> Result<Order, OrderError> {
        let status: FulfillmentStatus = status.parse()?;
        self.transition(id, status, reason).await?;
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: OrderId,
        status: FulfillmentStatus,
        reason: Option<String>,
    ) -> Result<TransitionOutcome, OrderError> {
        match self
            .act(id, OrderAction::Transition { status, reason })
            .await?
        {
            OrderActionResult::Transitioned(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    /// Carrier-driven transition; terminal orders report an unchanged outcome.
    #[instrument(skip(self))]
    pub async fn apply_tracking(
        &self,
        id: OrderId,
        status: FulfillmentStatus,
    ) -> Result<TransitionOutcome, OrderError> {
        match self.act(id, OrderAction::ApplyTracking(status)).await? {
            OrderActionResult::Transitioned(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    /// Moves every listed order that is `pending` or `awaiting_shipment` to `collection` and
    /// returns the ids that moved. Unknown ids and orders in other states are skipped.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn advance_to_collection(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, OrderError> {
        let known: HashSet<OrderId> = self.list().await?.into_iter().map(|o| o.id).collect();
        let mut seen = HashSet::new();
        let targets: Vec<OrderId> = ids
            .iter()
            .copied()
            .filter(|id| known.contains(id) && seen.insert(*id))
            .collect();
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let ops = targets
            .iter()
            .map(|&id| (id, OrderAction::AdvanceToCollection))
            .collect();
        let results = self.inner.transact(ops).await.map_err(Self::map_error)?;

        let moved: Vec<OrderId> = targets
            .into_iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                OrderActionResult::Transitioned(outcome) if outcome.changed() => Some(id),
                _ => None,
            })
            .collect();
        info!(moved = moved.len(), "Orders moved to collection");
        Ok(moved)
    }

    /// Attaches the carrier tracking code. Codes are unique across orders.
    #[instrument(skip(self))]
    pub async fn assign_billcode(&self, id: OrderId, billcode: &str) -> Result<(), OrderError> {
        match self
            .act(id, OrderAction::AssignBillcode(billcode.to_string()))
            .await?
        {
            OrderActionResult::BillcodeAssigned => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_payment_status(
        &self,
        id: OrderId,
        status: PaymentStatus,
    ) -> Result<(), OrderError> {
        match self.act(id, OrderAction::SetPaymentStatus(status)).await? {
            OrderActionResult::PaymentStatusSet => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}
