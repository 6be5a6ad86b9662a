//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (catalog item, customer, order, …)
//! implements to be managed by the generic [`ResourceActor`](crate::ResourceActor). It names the
//! associated types for IDs, DTOs, actions, context and errors, and provides the lifecycle hooks
//! the actor calls while processing requests.
//!
//! # Provided Methods (Hooks)
//! The following hooks have default implementations and only need to be overridden when an
//! entity wants custom behaviour:
//! - [`ActorEntity::unique_key`] (no secondary key)
//! - [`ActorEntity::on_create`] (no validation)
//! - [`ActorEntity::on_committed`] / [`ActorEntity::on_action_committed`] (no side effects)
//! - [`ActorEntity::on_delete`] (no validation)
//!
//! # Hook Ordering
//!
//! ```text
//! Create:  from_create_params -> (unique key check) -> on_create -> insert -> on_committed
//! Update:  clone -> on_update -> (unique key check) -> replace
//! Action:  clone -> handle_action -> (unique key check) -> replace -> on_action_committed
//! Delete:  on_delete -> remove
//! ```
//!
//! Updates and actions run against a staged copy, so a hook that returns an error (or a change
//! that collides with another entity's unique key) never leaves a half-applied entity behind.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// The trait is `#[async_trait]` so hooks can call other actors. The `Context` type is injected
/// into every hook when the actor is started with `run(context)`, which lets dependencies be wired
/// after all actors have been constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `Reserve`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per message. Clients get it back through
    /// [`FrameworkError::downcast_entity`](crate::FrameworkError::downcast_entity).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the ID and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Secondary key that must stay unique across every entity held by the actor.
    ///
    /// `None` means the entity does not participate in the uniqueness check.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is stored.
    /// An error here aborts the create and nothing is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once the created entity is in the store.
    ///
    /// Runs on the actor task, so implementations that do I/O should spawn.
    fn on_committed(&self, _ctx: &Self::Context) {}

    /// Called after an action (alone or inside a transaction) has been committed, with the
    /// entity as stored and the result that action produced.
    fn on_action_committed(&self, _result: &Self::ActionResult, _ctx: &Self::Context) {}

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
