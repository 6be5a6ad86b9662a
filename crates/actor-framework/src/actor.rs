//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns the state of one resource
//! type. It is the "server" side of the actor model: messages are processed one at a time, so the
//! entity store is never shared and needs no locks.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Concurrency Model
/// Each actor runs in its own Tokio task and processes its own messages sequentially. Two
/// requests touching the same entity can never interleave, which is what makes a
/// [`Transact`](crate::ResourceRequest::Transact) batch a real unit of work: it is checked and
/// committed before the next message is even read.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust,ignore
/// let (actor, client) = ResourceActor::<CatalogItem>::new(32);
/// tokio::spawn(actor.run(()));
/// let id = client.create(params).await?;
/// ```
///
/// # Staged Writes
///
/// * **Create**: builds the entity, checks its unique key, runs `on_create`, inserts it, then
///   fires `on_committed`.
/// * **Update / Action**: applied to a clone of the stored entity; the clone replaces the stored
///   one only when the hook succeeds and its unique key is still free.
/// * **Transact**: every action is applied to staged clones in order; the batch commits only if
///   all actions succeed and no unique key collides. `on_action_committed` then runs once per
///   action, against the final stored entity.
/// * **Delete**: `on_delete` may veto the removal.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

fn holds_key<T: ActorEntity>(item: &T, key: &str) -> bool {
    item.unique_key().as_deref() == Some(key)
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the MPSC channel; when it is full, client calls wait.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` argument is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Order" instead of "charm_commerce::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(id.clone(), update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id, &context).await;
                    match &result {
                        Ok(()) => info!(entity_type, %id, size = self.store.len(), "Deleted"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self.action(id.clone(), action, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Transact { ops, respond_to } => {
                    let count = ops.len();
                    debug!(entity_type, count, ?ops, "Transact");
                    let result = self.transact(ops, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, count, "Transaction committed"),
                        Err(e) => warn!(entity_type, count, error = %e, "Transaction rolled back"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        params: T::Create,
        ctx: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let id = T::Id::from(self.next_id);
        self.next_id += 1;

        let mut item = T::from_create_params(id.clone(), params).map_err(entity_error)?;
        // Checked before on_create so a rejected key never runs the hook's side effects.
        if let Some(key) = self.conflicting_key(&id, &item) {
            return Err(FrameworkError::Conflict(key));
        }
        item.on_create(ctx).await.map_err(entity_error)?;

        self.store.insert(id.clone(), item);
        if let Some(stored) = self.store.get(&id) {
            stored.on_committed(ctx);
        }
        Ok(id)
    }

    async fn update(
        &mut self,
        id: T::Id,
        update: T::Update,
        ctx: &T::Context,
    ) -> Result<T, FrameworkError> {
        let mut staged = self.staged_copy(&id)?;
        staged.on_update(update, ctx).await.map_err(entity_error)?;
        self.commit_one(id, staged.clone())?;
        Ok(staged)
    }

    async fn delete(&mut self, id: &T::Id, ctx: &T::Context) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete(ctx).await.map_err(entity_error)?;
        self.store.remove(id);
        Ok(())
    }

    async fn action(
        &mut self,
        id: T::Id,
        action: T::Action,
        ctx: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let mut staged = self.staged_copy(&id)?;
        let result = staged
            .handle_action(action, ctx)
            .await
            .map_err(entity_error)?;
        self.commit_one(id.clone(), staged)?;
        if let Some(stored) = self.store.get(&id) {
            stored.on_action_committed(&result, ctx);
        }
        Ok(result)
    }

    async fn transact(
        &mut self,
        ops: Vec<(T::Id, T::Action)>,
        ctx: &T::Context,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        let mut staged: HashMap<T::Id, T> = HashMap::new();
        let mut touched = Vec::with_capacity(ops.len());
        let mut results = Vec::with_capacity(ops.len());

        for (id, action) in ops {
            touched.push(id.clone());
            let item = match staged.entry(id.clone()) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => {
                    let current = self
                        .store
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                    slot.insert(current)
                }
            };
            results.push(item.handle_action(action, ctx).await.map_err(entity_error)?);
        }

        for (id, item) in &staged {
            let Some(key) = item.unique_key() else {
                continue;
            };
            let clash_in_store = self
                .store
                .iter()
                .filter(|(other_id, _)| !staged.contains_key(*other_id))
                .any(|(_, other)| holds_key(other, &key));
            let clash_in_batch = staged
                .iter()
                .any(|(other_id, other)| other_id != id && holds_key(other, &key));
            if clash_in_store || clash_in_batch {
                return Err(FrameworkError::Conflict(key));
            }
        }

        self.store.extend(staged);
        for (id, result) in touched.iter().zip(&results) {
            if let Some(stored) = self.store.get(id) {
                stored.on_action_committed(result, ctx);
            }
        }
        Ok(results)
    }

    fn staged_copy(&self, id: &T::Id) -> Result<T, FrameworkError> {
        self.store
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))
    }

    fn commit_one(&mut self, id: T::Id, item: T) -> Result<(), FrameworkError> {
        if let Some(key) = self.conflicting_key(&id, &item) {
            return Err(FrameworkError::Conflict(key));
        }
        self.store.insert(id, item);
        Ok(())
    }

    fn conflicting_key(&self, id: &T::Id, item: &T) -> Option<String> {
        let key = item.unique_key()?;
        self.store
            .iter()
            .any(|(other_id, other)| other_id != id && holds_key(other, &key))
            .then_some(key)
    }
}
