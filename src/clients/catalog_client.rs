//! # Catalog Client
//!
//! High-level API for the catalog actor (inventory ledger).
//! It wraps a `ResourceClient<CatalogItem>` and exposes stock operations.
use crate::catalog_actor::{CatalogAction, CatalogActionResult, CatalogError};
use crate::model::{CatalogCreate, CatalogId, CatalogItem, CatalogKind, CatalogUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// One stock reservation inside a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub id: CatalogId,
    pub kind: CatalogKind,
    pub quantity: u32,
    pub with_charms: bool,
}

impl Reservation {
    pub fn new(id: CatalogId, kind: CatalogKind, quantity: u32) -> Self {
        Self {
            id,
            kind,
            quantity,
            with_charms: false,
        }
    }

    pub fn with_charms(mut self, with_charms: bool) -> Self {
        self.with_charms = with_charms;
        self
    }

    fn action(&self) -> CatalogAction {
        CatalogAction::Reserve {
            kind: self.kind,
            quantity: self.quantity,
            with_charms: self.with_charms,
        }
    }
}

fn unexpected(result: CatalogActionResult) -> CatalogError {
    CatalogError::ActorCommunicationError(format!("unexpected catalog result: {result:?}"))
}

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<CatalogItem>,
}

#[async_trait]
impl ActorClient<CatalogItem> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<CatalogItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<CatalogError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => CatalogError::NotFound(id),
            Err(other) => CatalogError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<CatalogItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, params: CatalogCreate) -> Result<CatalogId, CatalogError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        id: CatalogId,
        update: CatalogUpdate,
    ) -> Result<CatalogItem, CatalogError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Current stock level of one entry.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: CatalogId) -> Result<u32, CatalogError> {
        match self
            .inner
            .perform_action(id, CatalogAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            CatalogActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Reserves stock on a single entry and returns its unit price.
    #[instrument(skip(self))]
    pub async fn reserve(&self, reservation: Reservation) -> Result<Decimal, CatalogError> {
        match self
            .inner
            .perform_action(reservation.id, reservation.action())
            .await
            .map_err(Self::map_error)?
        {
            CatalogActionResult::Reserved(price) => Ok(price),
            other => Err(unexpected(other)),
        }
    }

    /// Reserves every entry in one transaction and returns the unit prices in request order.
    ///
    /// If any reservation fails, no stock changes.
    #[instrument(skip(self, reservations), fields(count = reservations.len()))]
    pub async fn reserve_all(
        &self,
        reservations: &[Reservation],
    ) -> Result<Vec<Decimal>, CatalogError> {
        debug!(?reservations, "Reserving");
        let ops = reservations.iter().map(|r| (r.id, r.action())).collect();
        self.inner
            .transact(ops)
            .await
            .map_err(Self::map_error)?
            .into_iter()
            .map(|result| match result {
                CatalogActionResult::Reserved(price) => Ok(price),
                other => Err(unexpected(other)),
            })
            .collect()
    }

    /// Undoes `reserve_all` for the same reservations.
    #[instrument(skip(self, reservations), fields(count = reservations.len()))]
    pub async fn release_all(&self, reservations: &[Reservation]) -> Result<(), CatalogError> {
        let ops = reservations
            .iter()
            .map(|r| {
                (
                    r.id,
                    CatalogAction::Release {
                        quantity: r.quantity,
                    },
                )
            })
            .collect();
        self.inner.transact(ops).await.map_err(Self::map_error)?;
        Ok(())
    }
}
