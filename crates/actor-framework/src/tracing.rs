//! # Observability & Tracing
//!
//! Structured logging for every actor built on this crate. The actor loop logs its lifecycle
//! (`Actor started`, `Shutdown`) and each request with an `entity_type` field, so the formatter
//! hides module paths (`with_target(false)`) and keeps lines compact.
//!
//! ```bash
//! # Request outcomes only
//! RUST_LOG=info cargo run
//!
//! # Full payloads (`?params`, `?ops`) on every request
//! RUST_LOG=debug cargo run
//!
//! # Quiet framework, chatty domain
//! RUST_LOG=actor_framework=warn,charm_commerce=debug cargo run
//! ```
//!
//! A checkout at `info` level reads like:
//!
//! ```text
//! INFO Created entity_type="Customer" id=customer_1 size=1
//! INFO Transaction committed entity_type="CatalogItem" count=3
//! INFO Action ok entity_type="Customer" id=customer_1
//! INFO Created entity_type="Order" id=order_1 size=1
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Falls back to `info` when `RUST_LOG` is unset or invalid.
///
/// Calling it twice is harmless; the second call leaves the first subscriber in place.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
