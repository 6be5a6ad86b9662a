//! # Customer Actor
//!
//! Manages customers and the cart each one owns.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Customer`]
//! - [`error`] - [`CustomerError`]
//! - [`actions`] - cart edits ([`CustomerAction`]) and their results
//! - [`new()`] - Factory function that creates the actor and client
//!
//! Cart lines are shape-checked when they are added or edited (exclusive product/bundle, no
//! charms on bundles, at most five charms). Checkout consumes lines with
//! [`CustomerAction::ConsumeItems`] once their stock is reserved.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CustomerClient;
use crate::model::Customer;
use actor_framework::ResourceActor;

/// Creates a new customer actor and its client.
pub fn new() -> (ResourceActor<Customer>, CustomerClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    (actor, CustomerClient::new(generic_client))
}
