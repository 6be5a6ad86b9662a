//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient), one per actor.

pub mod catalog_client;
pub mod customer_client;
pub mod order_client;

pub use catalog_client::*;
pub use customer_client::*;
pub use order_client::*;
