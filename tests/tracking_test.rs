use actor_framework::ActorClient;
use async_trait::async_trait;
use charm_commerce::carrier::{CarrierClient, CarrierError, TrackingEvent, TrackingResponse};
use charm_commerce::config::TrackingSettings;
use charm_commerce::lifecycle::{CommerceSystem, SystemError};
use charm_commerce::model::{
    CatalogCreate, CustomerCreate, FulfillmentStatus, OrderCreate, OrderId, Selection,
    SelectionSource,
};
use charm_commerce::notify::LoggingHooks;
use charm_commerce::tracking::SyncReport;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Carrier double: answers from a fixed table and records every billcode it was asked about.
#[derive(Default)]
struct FakeCarrier {
    history: HashMap<String, Result<Vec<&'static str>, CarrierError>>,
    asked: Mutex<Vec<String>>,
}

impl FakeCarrier {
    fn with(mut self, billcode: &str, statuses: Vec<&'static str>) -> Self {
        self.history.insert(billcode.to_string(), Ok(statuses));
        self
    }

    fn failing(mut self, billcode: &str) -> Self {
        self.history.insert(
            billcode.to_string(),
            Err(CarrierError::Status {
                status: 503,
                body: "maintenance".into(),
            }),
        );
        self
    }

    fn asked(&self) -> Vec<String> {
        let mut asked = self.asked.lock().unwrap().clone();
        asked.sort();
        asked
    }
}

#[async_trait]
impl CarrierClient for FakeCarrier {
    async fn track(&self, billcode: &str) -> Result<TrackingResponse, CarrierError> {
        self.asked.lock().unwrap().push(billcode.to_string());
        match self.history.get(billcode) {
            Some(Ok(statuses)) => Ok(TrackingResponse {
                awb: Some(billcode.to_string()),
                history: statuses.iter().map(|s| TrackingEvent::new(*s)).collect(),
            }),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(TrackingResponse::default()),
        }
    }
}

fn settings() -> TrackingSettings {
    TrackingSettings {
        interval: Duration::from_millis(20),
        concurrency: 2,
        request_timeout: Duration::from_secs(1),
    }
}

async fn shipped_order(system: &CommerceSystem, billcode: &str, status: FulfillmentStatus) -> OrderId {
    let bundle = system
        .catalog
        .create_item(CatalogCreate::bundle("Gift Set", dec!(250), 10))
        .await
        .unwrap();
    let customer = system
        .customers
        .create_customer(CustomerCreate {
            name: "Citra".into(),
            email: "citra@example.com".into(),
        })
        .await
        .unwrap();
    let id = system
        .orders
        .create_order(OrderCreate {
            customer_id: customer,
            shipping_address: "Jl. Anggrek 2".into(),
            shipping_cost: dec!(9000),
            source: SelectionSource::Direct(vec![Selection::bundle(bundle, 1)]),
        })
        .await
        .unwrap();
    system.orders.assign_billcode(id, billcode).await.unwrap();
    system.orders.transition(id, status, None).await.unwrap();
    id
}

async fn status_of(system: &CommerceSystem, id: OrderId) -> FulfillmentStatus {
    system
        .orders
        .get(id)
        .await
        .unwrap()
        .expect("Order not found")
        .fulfillment_status
}

#[tokio::test]
async fn test_latest_carrier_status_drives_fulfillment() {
    let carrier = Arc::new(
        FakeCarrier::default()
            .with("JX1", vec!["Manifes - diterima gudang"])
            .with(
                "JX2",
                vec!["Manifes", "Paket akan dikirim ke alamat penerima"],
            )
            .with(
                "JX3",
                vec![
                    "Manifes",
                    "Paket telah diterima di Gateway",
                    "Paket telah diterima oleh BUDI",
                ],
            ),
    );
    let system = CommerceSystem::new(Arc::new(LoggingHooks)).with_carrier(carrier, settings());

    let packing = shipped_order(&system, "JX1", FulfillmentStatus::Collection).await;
    let on_shipping = shipped_order(&system, "JX2", FulfillmentStatus::Packing).await;
    let shipped = shipped_order(&system, "JX3", FulfillmentStatus::Delivery).await;

    let report = system.sync_tracking().await.unwrap();
    assert_eq!(
        report,
        SyncReport {
            examined: 3,
            updated: 3,
            failed: 0,
            skipped: 0,
        }
    );
    assert_eq!(status_of(&system, packing).await, FulfillmentStatus::Packing);
    assert_eq!(status_of(&system, on_shipping).await, FulfillmentStatus::OnShipping);
    assert_eq!(status_of(&system, shipped).await, FulfillmentStatus::Shipped);

    let again = system.sync_tracking().await.unwrap();
    assert_eq!(again.updated, 0);
}

#[tokio::test]
async fn test_one_failing_lookup_does_not_stop_the_others() {
    let carrier = Arc::new(
        FakeCarrier::default()
            .failing("JX1")
            .with("JX2", vec!["Manifes"])
            .with("JX3", vec!["Paket dalam perjalanan"]),
    );
    let system = CommerceSystem::new(Arc::new(LoggingHooks)).with_carrier(carrier, settings());

    let failing = shipped_order(&system, "JX1", FulfillmentStatus::Collection).await;
    let updated = shipped_order(&system, "JX2", FulfillmentStatus::Collection).await;
    let unmapped = shipped_order(&system, "JX3", FulfillmentStatus::Collection).await;

    let report = system.sync_tracking().await.unwrap();
    assert_eq!((report.examined, report.updated, report.failed), (3, 1, 1));
    assert_eq!(status_of(&system, failing).await, FulfillmentStatus::Collection);
    assert_eq!(status_of(&system, updated).await, FulfillmentStatus::Packing);
    assert_eq!(status_of(&system, unmapped).await, FulfillmentStatus::Collection);
}

#[tokio::test]
async fn test_terminal_and_unshipped_orders_are_not_polled() {
    let carrier = Arc::new(
        FakeCarrier::default()
            .with("JX1", vec!["Manifes"])
            .with("JX2", vec!["Manifes"])
            .with("JX3", vec!["Manifes"]),
    );
    let system =
        CommerceSystem::new(Arc::new(LoggingHooks)).with_carrier(carrier.clone(), settings());

    let done = shipped_order(&system, "JX1", FulfillmentStatus::Done).await;
    let waiting = shipped_order(&system, "JX2", FulfillmentStatus::AwaitingShipment).await;
    let active = shipped_order(&system, "JX3", FulfillmentStatus::Collection).await;

    let report = system.sync_tracking().await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.examined, 1);
    assert_eq!(carrier.asked(), vec!["JX3".to_string()]);

    assert_eq!(status_of(&system, done).await, FulfillmentStatus::Done);
    assert_eq!(status_of(&system, waiting).await, FulfillmentStatus::AwaitingShipment);
    assert_eq!(status_of(&system, active).await, FulfillmentStatus::Packing);
}

#[tokio::test]
async fn test_background_loop_runs_until_shutdown() {
    let carrier = Arc::new(FakeCarrier::default().with("JX1", vec!["Manifes"]));
    let mut system = CommerceSystem::new(Arc::new(LoggingHooks)).with_carrier(carrier, settings());
    let id = shipped_order(&system, "JX1", FulfillmentStatus::Collection).await;

    assert!(system.start_tracking());
    let mut status = FulfillmentStatus::Collection;
    for _ in 0..50 {
        status = status_of(&system, id).await;
        if status == FulfillmentStatus::Packing {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, FulfillmentStatus::Packing);

    tokio::time::timeout(Duration::from_secs(2), system.shutdown())
        .await
        .expect("shutdown hung")
        .expect("Shutdown failed");
}

#[tokio::test]
async fn test_tracking_needs_a_carrier() {
    let mut system = CommerceSystem::new(Arc::new(LoggingHooks));
    assert!(!system.start_tracking());
    assert!(matches!(
        system.sync_tracking().await,
        Err(SystemError::TrackingDisabled)
    ));
}

#[tokio::test]
async fn test_zero_interval_never_crashes_the_loop() {
    let carrier = Arc::new(FakeCarrier::default().with("JX1", vec!["Manifes"]));
    let zero = TrackingSettings {
        interval: Duration::ZERO,
        ..settings()
    };
    let mut system = CommerceSystem::new(Arc::new(LoggingHooks)).with_carrier(carrier, zero);
    shipped_order(&system, "JX1", FulfillmentStatus::Collection).await;

    assert!(system.start_tracking());
    tokio::time::timeout(Duration::from_secs(2), system.shutdown())
        .await
        .expect("shutdown hung")
        .expect("Shutdown failed");
}
