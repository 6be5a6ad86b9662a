//! # Customer Client
//!
//! High-level API for the customer actor: registration and cart maintenance.
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::model::{
    CartItem, CartItemId, CatalogId, Customer, CustomerCreate, CustomerId, CustomerUpdate,
    Selection,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

fn unexpected(result: CustomerActionResult) -> CustomerError {
    CustomerError::ActorCommunicationError(format!("unexpected customer result: {result:?}"))
}

/// Client for interacting with the customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

#[async_trait]
impl ActorClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<CustomerError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => CustomerError::NotFound(id),
            Err(other) => CustomerError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }

    async fn act(
        &self,
        id: CustomerId,
        action: CustomerAction,
    ) -> Result<CustomerActionResult, CustomerError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn create_customer(&self, params: CustomerCreate) -> Result<CustomerId, CustomerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        id: CustomerId,
        selection: Selection,
    ) -> Result<CartItemId, CustomerError> {
        match self.act(id, CustomerAction::AddItem(selection)).await? {
            CustomerActionResult::ItemAdded(item_id) => Ok(item_id),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        id: CustomerId,
        item_id: CartItemId,
        quantity: Option<u32>,
        charms: Option<Vec<CatalogId>>,
        message: Option<String>,
    ) -> Result<CartItem, CustomerError> {
        let action = CustomerAction::UpdateItem {
            item_id,
            quantity,
            charms,
            message,
        };
        match self.act(id, action).await? {
            CustomerActionResult::ItemUpdated(item) => Ok(item),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        id: CustomerId,
        item_id: CartItemId,
    ) -> Result<(), CustomerError> {
        match self.act(id, CustomerAction::RemoveItem(item_id)).await? {
            CustomerActionResult::ItemRemoved => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Removes the given lines from the cart and hands them back.
    #[instrument(skip(self))]
    pub async fn consume_items(
        &self,
        id: CustomerId,
        item_ids: Vec<CartItemId>,
    ) -> Result<Vec<CartItem>, CustomerError> {
        match self.act(id, CustomerAction::ConsumeItems(item_ids)).await? {
            CustomerActionResult::Consumed(items) => Ok(items),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn restore_items(
        &self,
        id: CustomerId,
        items: Vec<CartItem>,
    ) -> Result<(), CustomerError> {
        match self.act(id, CustomerAction::RestoreItems(items)).await? {
            CustomerActionResult::Restored => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn test_add_to_cart_returns_new_item_id() {
        let mut mock = MockClient::<Customer>::new();
        mock.expect_action(CustomerId(1))
            .return_ok(CustomerActionResult::ItemAdded(CartItemId(4)));

        let client = CustomerClient::new(mock.client());
        let id = client
            .add_to_cart(CustomerId(1), Selection::product(CatalogId(1), 1))
            .await
            .unwrap();
        assert_eq!(id, CartItemId(4));
        mock.verify();
    }

    #[tokio::test]
    async fn test_unknown_customer_maps_to_not_found() {
        let mut mock = MockClient::<Customer>::new();
        mock.expect_action(CustomerId(9))
            .return_err(FrameworkError::NotFound("customer_9".into()));

        let client = CustomerClient::new(mock.client());
        let result = client.consume_items(CustomerId(9), vec![CartItemId(1)]).await;
        assert_eq!(result, Err(CustomerError::NotFound("customer_9".into())));
    }
}
