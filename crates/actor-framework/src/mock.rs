//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from a queue
//! of expectations instead of a running actor. Use it to test an actor or a client wrapper while
//! its dependencies stay scripted.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | Scripted responses | Real state management |
//! | **Error Injection** | Easy (`return_err`) | Requires specific state |
//! | **Use Case** | Isolating one actor from its dependencies | Full system tests |
//!
//! ## Testing Strategies
//!
//! - **Pure mock**: exercise a client wrapper against a `MockClient`.
//! - **Single actor**: spawn one `ResourceActor` with `()` context.
//! - **Actor with mocked dependencies**: spawn the real actor under test and pass clients obtained
//!   from `MockClient::client()` as its context (see `tests/order_actor_test.rs` in the root crate).
//! - **Full system**: start every actor through the lifecycle orchestrator.
//!
//! ```rust,ignore
//! let mut catalog = MockClient::<CatalogItem>::new();
//! catalog.expect_transact().return_ok(vec![CatalogActionResult::Reserved(price)]);
//!
//! let client = CatalogClient::new(catalog.client());
//! // ... drive the code under test ...
//! catalog.verify(); // every expectation consumed, no unexpected request
//! ```
//!
//! Expectations are consumed strictly in order. A request that does not match the next
//! expectation (wrong kind or wrong id) is recorded, its response channel is dropped (the caller
//! sees `FrameworkError::ActorDropped`), and [`MockClient::verify`] panics with the details.
//!
//! For lower-level assertions on the exact payload, use [`create_mock_client`] and the
//! `expect_*` receiver helpers.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    Transact {
        response: Result<Vec<T::ActionResult>, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Get { id, .. } => format!("get {id}"),
            Expectation::Create { .. } => "create".to_string(),
            Expectation::List { .. } => "list".to_string(),
            Expectation::Update { id, .. } => format!("update {id}"),
            Expectation::Action { id, .. } => format!("action on {id}"),
            Expectation::Transact { .. } => "transact".to_string(),
        }
    }
}

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { params, .. } => format!("create {params:?}"),
        ResourceRequest::Get { id, .. } => format!("get {id}"),
        ResourceRequest::List { .. } => "list".to_string(),
        ResourceRequest::Update { id, update, .. } => format!("update {id} {update:?}"),
        ResourceRequest::Delete { id, .. } => format!("delete {id}"),
        ResourceRequest::Action { id, action, .. } => format!("action on {id} {action:?}"),
        ResourceRequest::Transact { ops, .. } => format!("transact {ops:?}"),
    }
}

struct MockState<T: ActorEntity> {
    expectations: VecDeque<Expectation<T>>,
    history: Vec<String>,
    failures: Vec<String>,
}

fn lock<T: ActorEntity>(state: &Mutex<MockState<T>>) -> MutexGuard<'_, MockState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    state: Arc<Mutex<MockState<T>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let state = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            history: Vec::new(),
            failures: Vec::new(),
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let description = describe_request(&request);
                let expectation = {
                    let mut state = lock(&task_state);
                    state.history.push(description.clone());
                    state.expectations.pop_front()
                };

                let unmatched = match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (
                        ResourceRequest::Transact { respond_to, .. },
                        Some(Expectation::Transact { response }),
                    ) => {
                        let _ = respond_to.send(response);
                        None
                    }
                    (_, expectation) => Some(format!(
                        "unexpected request `{description}`, expected {}",
                        expectation.map_or_else(|| "nothing".to_string(), |e| e.describe())
                    )),
                };

                if let Some(failure) = unmatched {
                    lock(&task_state).failures.push(failure);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> IdExpectationBuilder<T, Option<T>> {
        IdExpectationBuilder {
            id,
            state: self.state.clone(),
            make: |id, response| Expectation::Get { id, response },
        }
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder {
            state: self.state.clone(),
            make: |response| Expectation::Create { response },
        }
    }

    /// Expects a `list`.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder {
            state: self.state.clone(),
            make: |response| Expectation::List { response },
        }
    }

    /// Expects an `update` of `id`.
    pub fn expect_update(&mut self, id: T::Id) -> IdExpectationBuilder<T, T> {
        IdExpectationBuilder {
            id,
            state: self.state.clone(),
            make: |id, response| Expectation::Update { id, response },
        }
    }

    /// Expects an action on `id`.
    pub fn expect_action(&mut self, id: T::Id) -> IdExpectationBuilder<T, T::ActionResult> {
        IdExpectationBuilder {
            id,
            state: self.state.clone(),
            make: |id, response| Expectation::Action { id, response },
        }
    }

    /// Expects a `transact` batch.
    pub fn expect_transact(&mut self) -> ExpectationBuilder<T, Vec<T::ActionResult>> {
        ExpectationBuilder {
            state: self.state.clone(),
            make: |response| Expectation::Transact { response },
        }
    }

    /// Debug rendering of every request received so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        lock(&self.state).history.clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.failures.is_empty() {
            panic!("Mock received unexpected requests: {:?}", state.failures);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state.expectations.iter().map(|e| e.describe()).collect();
            panic!("Not all expectations were met: {remaining:?}");
        }
    }
}

/// Builder for expectations that are not tied to an entity id.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    state: Arc<Mutex<MockState<T>>>,
    make: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        lock(&self.state).expectations.push_back(expectation);
    }
}

/// Builder for expectations addressed to one entity id.
pub struct IdExpectationBuilder<T: ActorEntity, R> {
    id: T::Id,
    state: Arc<Mutex<MockState<T>>>,
    make: fn(T::Id, Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ActorEntity, R> IdExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(self.id, response);
        lock(&self.state).expectations.push_back(expectation);
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a client and hands back the raw receiver, so a test can inspect each request payload
/// and answer it by hand.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Transact request
pub async fn expect_transact<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    Vec<(T::Id, T::Action)>,
    tokio::sync::oneshot::Sender<Result<Vec<T::ActionResult>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Transact { ops, respond_to }) => Some((ops, respond_to)),
        _ => None,
    }
}
