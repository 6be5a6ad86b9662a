//! [`ActorEntity`] implementation for [`Customer`], including cart maintenance.

use super::actions::{CustomerAction, CustomerActionResult};
use super::error::CustomerError;
use crate::model::{CartItem, CartItemId, Customer, CustomerCreate, CustomerId, CustomerUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

fn check_email(email: &str) -> Result<(), CustomerError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(CustomerError::ValidationError(format!(
            "invalid email address: {email:?}"
        ))),
    }
}

impl Customer {
    fn cart_item_mut(&mut self, id: CartItemId) -> Result<&mut CartItem, CustomerError> {
        self.cart
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CustomerError::CartItemNotFound(id.to_string()))
    }
}

#[async_trait]
impl ActorEntity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;
    type Context = ();
    type Error = CustomerError;

    fn from_create_params(id: CustomerId, params: CustomerCreate) -> Result<Self, Self::Error> {
        check_email(&params.email)?;
        Ok(Self::new(id, params.name, params.email))
    }

    async fn on_update(&mut self, update: CustomerUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(email) = update.email {
            check_email(&email)?;
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CustomerAction,
        _ctx: &(),
    ) -> Result<CustomerActionResult, Self::Error> {
        match action {
            CustomerAction::AddItem(selection) => {
                selection.validate()?;
                Ok(CustomerActionResult::ItemAdded(self.push_cart_item(selection)))
            }
            CustomerAction::UpdateItem {
                item_id,
                quantity,
                charms,
                message,
            } => {
                let item = self.cart_item_mut(item_id)?;
                let mut selection = item.selection.clone();
                if let Some(quantity) = quantity {
                    selection.quantity = quantity;
                }
                if let Some(charms) = charms {
                    selection.charms = charms;
                }
                if message.is_some() {
                    selection.message = message;
                }
                selection.validate()?;
                item.selection = selection;
                Ok(CustomerActionResult::ItemUpdated(item.clone()))
            }
            CustomerAction::RemoveItem(item_id) => {
                let before = self.cart.len();
                self.cart.retain(|item| item.id != item_id);
                if self.cart.len() == before {
                    return Err(CustomerError::CartItemNotFound(item_id.to_string()));
                }
                Ok(CustomerActionResult::ItemRemoved)
            }
            CustomerAction::ConsumeItems(ids) => {
                if let Some(missing) = ids.iter().find(|id| self.cart_item(**id).is_none()) {
                    return Err(CustomerError::CartItemNotFound(missing.to_string()));
                }
                let (taken, kept): (Vec<CartItem>, Vec<CartItem>) = std::mem::take(&mut self.cart)
                    .into_iter()
                    .partition(|item| ids.contains(&item.id));
                self.cart = kept;
                Ok(CustomerActionResult::Consumed(taken))
            }
            CustomerAction::RestoreItems(items) => {
                for item in items {
                    if self.cart_item(item.id).is_none() {
                        self.cart.push(item);
                    }
                }
                self.cart.sort_by_key(|item| item.id.0);
                Ok(CustomerActionResult::Restored)
            }
        }
    }
}
