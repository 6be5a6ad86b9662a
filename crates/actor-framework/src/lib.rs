//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent resource actors: one Tokio task owns every entity of
//! one type, and the rest of the system talks to it through a cloneable client.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - business rules, written once as hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential message processing over a private store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests and replies
//!
//! Because an actor handles one message at a time, a check-then-write inside a hook can never race
//! with another request to the same actor. [`ResourceClient::transact`] extends that to a batch:
//! several actions across several entities commit together or not at all.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Bin {
//!     id: u32,
//!     stock: u32,
//! }
//!
//! #[derive(Debug)]
//! struct BinCreate {
//!     stock: u32,
//! }
//!
//! #[derive(Debug)]
//! enum BinAction {
//!     Take(u32),
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("only {available} left")]
//! struct Shortage {
//!     available: u32,
//! }
//!
//! #[async_trait]
//! impl ActorEntity for Bin {
//!     type Id = u32;
//!     type Create = BinCreate;
//!     type Update = ();
//!     type Action = BinAction;
//!     type ActionResult = u32;
//!     type Context = ();
//!     type Error = Shortage;
//!
//!     fn from_create_params(id: u32, params: BinCreate) -> Result<Self, Shortage> {
//!         Ok(Self { id, stock: params.stock })
//!     }
//!
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Shortage> {
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: BinAction, _: &()) -> Result<u32, Shortage> {
//!         let BinAction::Take(n) = action;
//!         if n > self.stock {
//!             return Err(Shortage { available: self.stock });
//!         }
//!         self.stock -= n;
//!         Ok(self.stock)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Bin>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let a = client.create(BinCreate { stock: 5 }).await.unwrap();
//!     let b = client.create(BinCreate { stock: 1 }).await.unwrap();
//!
//!     // The second take fails, so the first one is rolled back too.
//!     let err = client
//!         .transact(vec![(a, BinAction::Take(2)), (b, BinAction::Take(3))])
//!         .await
//!         .unwrap_err();
//!     assert_eq!(err.downcast_entity::<Shortage>().unwrap().available, 1);
//!     assert_eq!(client.get(a).await.unwrap().unwrap().stock, 5);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are handed over when the actor starts, through `run(context)`, not when it is
//! constructed. All actors can therefore be created first and wired afterwards, which is how an
//! order actor gets the catalog and customer clients it calls from its `on_create` hook.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient<T>` from a scripted queue, so an actor can
//! be tested against mocked dependencies. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
