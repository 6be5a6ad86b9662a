//! # System Lifecycle
//!
//! Starting, wiring and stopping the shop's actors.
//!
//! [`CommerceSystem`] spawns the catalog, customer and order actors, injects the catalog and
//! customer clients into the order actor through `run(ctx)`, and owns the optional background
//! tracking loop. Shutdown cancels the loop first and then drops every client so the actors see
//! their channels close and exit.
//!
//! Logging is set up once per process with
//! [`setup_tracing`](actor_framework::tracing::setup_tracing).

pub mod commerce_system;

pub use commerce_system::*;
