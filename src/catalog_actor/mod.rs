//! # Catalog Actor
//!
//! The inventory ledger. Products, bundles and charms all live in this one actor, each with a
//! stock counter and a cumulative sold counter.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`CatalogItem`]
//! - [`error`] - [`CatalogError`]
//! - [`actions`] - [`CatalogAction`] and [`CatalogActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Reservations
//!
//! A reservation checks stock and decrements it inside the actor, so two checkouts can never both
//! read the same stale count. All reservations of one order go out as a single framework
//! transaction: either every line gets its stock or nothing changes.
//!
//! ```rust,ignore
//! let prices = catalog.reserve_all(&[
//!     Reservation::new(necklace, CatalogKind::Product, 2).with_charms(true),
//!     Reservation::new(star, CatalogKind::Charm, 1),
//! ]).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CatalogClient;
use crate::model::CatalogItem;
use actor_framework::ResourceActor;

/// Creates a new catalog actor and its client.
pub fn new() -> (ResourceActor<CatalogItem>, CatalogClient) {
    let (actor, generic_client) = ResourceActor::new(64);
    (actor, CatalogClient::new(generic_client))
}
