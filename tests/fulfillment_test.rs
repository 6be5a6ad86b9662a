use actor_framework::ActorClient;
use async_trait::async_trait;
use charm_commerce::lifecycle::CommerceSystem;
use charm_commerce::model::{
    CatalogCreate, CustomerCreate, FulfillmentStatus, Order, OrderCreate, OrderId, OrderUpdate,
    PaymentStatus, Selection, SelectionSource,
};
use charm_commerce::notify::{NotificationHooks, NotifyError, ReviewTokenIssuer};
use charm_commerce::order_actor::OrderError;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, PartialEq)]
enum Event {
    Created(OrderId),
    Changed(OrderId, FulfillmentStatus, FulfillmentStatus),
}

struct RecordingHooks(mpsc::UnboundedSender<Event>);

#[async_trait]
impl NotificationHooks for RecordingHooks {
    async fn on_order_created(&self, order: &Order) -> Result<(), NotifyError> {
        let _ = self.0.send(Event::Created(order.id));
        Ok(())
    }

    async fn on_status_changed(
        &self,
        order: &Order,
        from: FulfillmentStatus,
        to: FulfillmentStatus,
    ) -> Result<(), NotifyError> {
        let _ = self.0.send(Event::Changed(order.id, from, to));
        Ok(())
    }
}

async fn place_order(system: &CommerceSystem) -> OrderId {
    let bundle = system
        .catalog
        .create_item(CatalogCreate::bundle("Gift Set", dec!(250), 10))
        .await
        .expect("Failed to create bundle");
    let customer = system
        .customers
        .create_customer(CustomerCreate {
            name: "Budi".into(),
            email: "budi@example.com".into(),
        })
        .await
        .expect("Failed to create customer");
    system
        .orders
        .create_order(OrderCreate {
            customer_id: customer,
            shipping_address: "Jl. Kenanga 8".into(),
            shipping_cost: dec!(9000),
            source: SelectionSource::Direct(vec![Selection::bundle(bundle, 1)]),
        })
        .await
        .expect("Failed to create order")
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<Event>) -> Option<Event> {
    tokio::time::timeout(Duration::from_millis(200), events.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn test_hooks_fire_once_per_committed_change() {
    let (tx, mut events) = mpsc::unbounded_channel();
    let system = CommerceSystem::new(Arc::new(RecordingHooks(tx)));
    let id = place_order(&system).await;

    assert_eq!(next_event(&mut events).await, Some(Event::Created(id)));

    system
        .orders
        .transition(id, FulfillmentStatus::Shipped, None)
        .await
        .unwrap();
    let repeat = system
        .orders
        .transition(id, FulfillmentStatus::Shipped, None)
        .await
        .unwrap();
    assert!(!repeat.changed());

    assert_eq!(
        next_event(&mut events).await,
        Some(Event::Changed(
            id,
            FulfillmentStatus::AwaitingShipment,
            FulfillmentStatus::Shipped
        ))
    );
    assert_eq!(next_event(&mut events).await, None);
}

#[tokio::test]
async fn test_failed_checkout_fires_no_hooks() {
    let (tx, mut events) = mpsc::unbounded_channel();
    let system = CommerceSystem::new(Arc::new(RecordingHooks(tx)));
    let customer = system
        .customers
        .create_customer(CustomerCreate {
            name: "Budi".into(),
            email: "budi@example.com".into(),
        })
        .await
        .unwrap();

    let result = system
        .orders
        .create_order(OrderCreate {
            customer_id: customer,
            shipping_address: "Jl. Kenanga 8".into(),
            shipping_cost: dec!(9000),
            source: SelectionSource::Cart,
        })
        .await;

    assert!(result.is_err());
    assert_eq!(next_event(&mut events).await, None);
}

#[tokio::test]
async fn test_rejection_requires_reason_and_later_transitions_clear_it() {
    let (tx, _events) = mpsc::unbounded_channel();
    let system = CommerceSystem::new(Arc::new(RecordingHooks(tx)));
    let id = place_order(&system).await;

    let missing = system
        .orders
        .transition_order(id, "not_accepted", Some("   ".into()))
        .await;
    assert_eq!(missing, Err(OrderError::MissingReason));

    let rejected = system
        .orders
        .transition_order(id, "not_accepted", Some("  address unreachable ".into()))
        .await
        .unwrap();
    assert_eq!(rejected.fulfillment_status, FulfillmentStatus::NotAccepted);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("address unreachable"));

    let reopened = system
        .orders
        .transition_order(id, "pending", Some("ignored".into()))
        .await
        .unwrap();
    assert_eq!(reopened.fulfillment_status, FulfillmentStatus::Pending);
    assert_eq!(reopened.rejection_reason, None);

    let unknown = system.orders.transition_order(id, "lost", None).await;
    assert_eq!(unknown, Err(OrderError::InvalidStatus("lost".into())));
}

#[tokio::test]
async fn test_advance_to_collection_moves_only_waiting_orders() {
    let (tx, _events) = mpsc::unbounded_channel();
    let system = CommerceSystem::new(Arc::new(RecordingHooks(tx)));
    let waiting = place_order(&system).await;
    let pending = place_order(&system).await;
    let shipped = place_order(&system).await;

    system
        .orders
        .transition(pending, FulfillmentStatus::Pending, None)
        .await
        .unwrap();
    system
        .orders
        .transition(shipped, FulfillmentStatus::Shipped, None)
        .await
        .unwrap();

    let moved = system
        .orders
        .advance_to_collection(&[waiting, pending, shipped, waiting, OrderId(999)])
        .await
        .unwrap();
    assert_eq!(moved, vec![waiting, pending]);

    let order = system.orders.get(shipped).await.unwrap().unwrap();
    assert_eq!(order.fulfillment_status, FulfillmentStatus::Shipped);
    let order = system.orders.get(waiting).await.unwrap().unwrap();
    assert_eq!(order.fulfillment_status, FulfillmentStatus::Collection);
}

#[tokio::test]
async fn test_billcodes_are_unique_across_orders() {
    let (tx, _events) = mpsc::unbounded_channel();
    let system = CommerceSystem::new(Arc::new(RecordingHooks(tx)));
    let first = place_order(&system).await;
    let second = place_order(&system).await;

    system.orders.assign_billcode(first, " JX1001 ").await.unwrap();
    let result = system.orders.assign_billcode(second, "JX1001").await;
    assert!(matches!(result, Err(OrderError::Conflict(_))));

    let order = system.orders.get(first).await.unwrap().unwrap();
    assert_eq!(order.billcode(), Some("JX1001"));
    let order = system.orders.get(second).await.unwrap().unwrap();
    assert_eq!(order.billcode(), None);
}

#[tokio::test]
async fn test_terminal_orders_reject_edits_and_deletes() {
    let (tx, _events) = mpsc::unbounded_channel();
    let system = CommerceSystem::new(Arc::new(RecordingHooks(tx)));
    let id = place_order(&system).await;

    let updated = system
        .orders
        .update_order(
            id,
            OrderUpdate {
                shipping_address: Some("Jl. Mawar 1".into()),
                shipping_cost: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.shipping_address, "Jl. Mawar 1");

    system
        .orders
        .set_payment_status(id, PaymentStatus::Paid)
        .await
        .unwrap();
    system
        .orders
        .transition(id, FulfillmentStatus::Cancelled, None)
        .await
        .unwrap();

    let edit = system
        .orders
        .update_order(id, OrderUpdate::default())
        .await;
    assert!(matches!(edit, Err(OrderError::Validation(_))));
    assert!(matches!(
        system.orders.delete(id).await,
        Err(OrderError::Validation(_))
    ));

    let order = system.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_done_orders_receive_a_review_token() {
    let reviews = ReviewTokenIssuer::new("https://shop.example/");
    let system = CommerceSystem::new(Arc::new(reviews.clone()));
    let id = place_order(&system).await;

    system
        .orders
        .transition(id, FulfillmentStatus::Done, None)
        .await
        .unwrap();

    let mut token = None;
    for _ in 0..20 {
        token = reviews.token_for(id);
        if token.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let token = token.expect("review token was not issued");
    assert_eq!(
        reviews.review_url(&token),
        format!("https://shop.example/review/?token={}", token.token)
    );
    assert!(reviews.redeem(token.token, Utc::now()).is_ok());
    assert!(reviews.redeem(token.token, Utc::now()).is_err());
}
