//! # Tracking Synchronizer
//!
//! Polls the carrier for every order that carries a tracking code and has left
//! `awaiting_shipment`, maps the latest history entry to a fulfillment status and applies it.
//! Each order is its own unit of work: a carrier failure is logged and counted, and the run
//! carries on with the remaining orders.

pub mod mapping;
pub mod synchronizer;

pub use mapping::*;
pub use synchronizer::*;
