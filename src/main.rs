//! # Charm Commerce demo
//!
//! Seeds a catalog and a customer, checks out a necklace with a charm and walks the order
//! through fulfillment. When the carrier is configured the tracking loop keeps running until
//! Ctrl-C.

use charm_commerce::config::Settings;
use charm_commerce::lifecycle::CommerceSystem;
use charm_commerce::model::{
    CatalogCreate, CustomerCreate, FulfillmentStatus, ProductCategory, Selection, SelectionSource,
};
use charm_commerce::setup_tracing;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let settings = Settings::load().map_err(|e| e.to_string())?;
    info!(
        carrier = settings.carrier.is_some(),
        payment = settings.payment.is_some(),
        "Starting commerce system"
    );
    let mut system = CommerceSystem::from_settings(&settings).map_err(|e| e.to_string())?;

    let (necklace, charm) = async {
        let necklace = system
            .catalog
            .create_item(CatalogCreate::product(
                "Luna Necklace",
                ProductCategory::Necklace,
                Decimal::from(100),
                5,
            ))
            .await?;
        let charm = system
            .catalog
            .create_item(CatalogCreate::charm("Star Charm", Decimal::from(10), 20))
            .await?;
        Ok::<_, charm_commerce::catalog_actor::CatalogError>((necklace, charm))
    }
    .instrument(tracing::info_span!("catalog_seed"))
    .await
    .map_err(|e| e.to_string())?;

    let customer = system
        .customers
        .create_customer(CustomerCreate {
            name: "Ayu Lestari".to_string(),
            email: "ayu@example.com".to_string(),
        })
        .await
        .map_err(|e| e.to_string())?;

    system
        .customers
        .add_to_cart(
            customer,
            Selection::product(necklace, 2)
                .with_charms(vec![charm, charm])
                .with_message("Happy birthday"),
        )
        .await
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("checkout", %customer);
    let receipt = system
        .checkout(
            customer,
            "Jl. Melati 3, Bekasi".to_string(),
            Decimal::from(12),
            SelectionSource::Cart,
        )
        .instrument(span)
        .await;

    match receipt {
        Ok(receipt) => {
            let order = receipt.order;
            info!(
                order = %order.id,
                total = %order.total_price,
                payment_token = receipt.payment.is_some(),
                "Order placed"
            );

            let collected = system
                .orders
                .advance_to_collection(&[order.id])
                .await
                .map_err(|e| e.to_string())?;
            info!(count = collected.len(), "Orders moved to collection");

            system
                .orders
                .transition(order.id, FulfillmentStatus::Done, None)
                .await
                .map_err(|e| e.to_string())?;
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    if system.start_tracking() {
        info!("Tracking loop running, press Ctrl-C to stop");
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Could not listen for Ctrl-C");
        }
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Application completed successfully");
    Ok(())
}
