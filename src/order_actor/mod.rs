//! # Order Actor
//!
//! Builds orders from checkouts and drives them through fulfillment.
//!
//! ## Structure
//!
//! - [`composer`] - one [`Selection`](crate::model::Selection) to reservations and a priced line
//! - [`builder`] - the checkout pipeline run by `on_create`
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//!   and the [`OrderContext`] it needs
//! - [`actions`] - the fulfillment state machine ([`OrderAction`])
//! - [`error`] - [`OrderError`]
//!
//! ## Atomicity
//!
//! A create either stores a fully priced order or nothing. Stock for every line is reserved in a
//! single catalog transaction, and a failure after that point releases it again. Notification
//! hooks run only once the order is in the store.

pub mod actions;
pub mod builder;
pub mod composer;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use actor_framework::ResourceActor;

/// Creates a new order actor and its client. Start it with `actor.run(OrderContext { .. })`.
pub fn new() -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    (actor, OrderClient::new(generic_client))
}
