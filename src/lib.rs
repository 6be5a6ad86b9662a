//! # Charm Commerce
//!
//! Order management for a small jewelry shop: products that can carry charms, gift bundles,
//! per-customer carts, checkout with all-or-nothing stock reservation, fulfillment tracking
//! against the carrier, and payment tokens.
//!
//! ## Core Components
//!
//! - **[model]**: Pure data structures ([`CatalogItem`](model::CatalogItem),
//!   [`Customer`](model::Customer), [`Order`](model::Order)) and the status enums.
//! - **[catalog_actor]**, **[customer_actor]**, **[order_actor]**: one
//!   [`ResourceActor`](actor_framework::ResourceActor) per resource. Each entity implements
//!   [`ActorEntity`](actor_framework::ActorEntity); its rules live in the actor module.
//! - **[clients]**: Typed wrappers that hide message passing and map framework errors into each
//!   actor's own error type.
//! - **[carrier]** and **[payment]**: HTTP integrations behind the [`CarrierClient`](carrier::CarrierClient)
//!   and [`PaymentGateway`](payment::PaymentGateway) traits.
//! - **[tracking]**: Periodic carrier polling that moves orders through fulfillment.
//! - **[notify]**: Post-commit hooks (confirmation, status change, review invitations).
//! - **[config]**: Environment-driven [`Settings`](config::Settings).
//! - **[lifecycle]**: [`CommerceSystem`](lifecycle::CommerceSystem) wires and stops everything.
//!
//! ## Checkout
//!
//! An order is built inside the order actor's `on_create` hook. The builder reserves every stock
//! unit in one catalog transaction, prices lines from what the catalog returned, and only then
//! lets the order be stored. Any failure leaves stock and the cart as they were.
//!
//! ## Testing
//!
//! Clients are tested against [`actor_framework::mock`]; HTTP integrations against `wiremock`.
//! End-to-end flows live in `tests/`.

pub mod carrier;
pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod payment;
pub mod tracking;

pub use actor_framework::tracing::setup_tracing;
