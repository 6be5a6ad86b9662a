//! Pure data structures. The three stored entities ([`CatalogItem`], [`Customer`], [`Order`])
//! implement [`ActorEntity`](actor_framework::ActorEntity) in their actor modules.

pub mod catalog;
pub mod customer;
pub mod order;
pub mod selection;
pub mod status;

pub use catalog::*;
pub use customer::*;
pub use order::*;
pub use selection::*;
pub use status::*;
