use crate::carrier::{CarrierClient, CarrierError, JntClient};
use crate::clients::{CatalogClient, CustomerClient, OrderClient};
use crate::config::{Settings, TrackingSettings};
use crate::model::{CustomerId, Order, OrderCreate, SelectionSource};
use crate::notify::{HookFanout, LoggingHooks, NotificationHooks, ReviewTokenIssuer};
use crate::order_actor::{OrderContext, OrderError};
use crate::payment::{MidtransClient, PaymentError, PaymentGateway, PaymentRequest, PaymentToken};
use crate::tracking::{SyncReport, TrackingSynchronizer};
use actor_framework::ActorClient;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Carrier(#[from] CarrierError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("tracking is not configured")]
    TrackingDisabled,
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("task failed: {0}")]
    TaskFailed(String),
}

/// A stored order and, when a payment gateway is configured and answered, its payment token.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub payment: Option<PaymentToken>,
}

/// Starts, wires and stops every actor of the shop.
///
/// The catalog and customer actors need no context. The order actor gets both of their clients
/// and the notification hooks through `run(ctx)`. The carrier and payment integrations are
/// optional.
///
/// ```ignore
/// let system = CommerceSystem::from_settings(&Settings::load()?)?;
/// let receipt = system
///     .checkout(customer_id, "Jl. Melati 3".into(), dec!(12000), SelectionSource::Cart)
///     .await?;
/// system.shutdown().await?;
/// ```
pub struct CommerceSystem {
    pub catalog: CatalogClient,
    pub customers: CustomerClient,
    pub orders: OrderClient,
    /// Set when built from settings; issues review links when orders are done.
    pub reviews: Option<ReviewTokenIssuer>,
    payment: Option<Arc<dyn PaymentGateway>>,
    tracking: Option<TrackingSynchronizer>,
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl CommerceSystem {
    /// Spawns the three actors. Must be called inside a Tokio runtime.
    pub fn new(hooks: Arc<dyn NotificationHooks>) -> Self {
        let (catalog_actor, catalog) = crate::catalog_actor::new();
        let (customer_actor, customers) = crate::customer_actor::new();
        let (order_actor, orders) = crate::order_actor::new();

        let catalog_handle = tokio::spawn(catalog_actor.run(()));
        let customer_handle = tokio::spawn(customer_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            customers: customers.clone(),
            catalog: catalog.clone(),
            hooks,
        }));

        Self {
            catalog,
            customers,
            orders,
            reviews: None,
            payment: None,
            tracking: None,
            shutdown: CancellationToken::new(),
            handles: vec![catalog_handle, customer_handle, order_handle],
        }
    }

    /// Builds the system with logging and review hooks plus every integration `settings` enables.
    pub fn from_settings(settings: &Settings) -> Result<Self, SystemError> {
        let reviews = ReviewTokenIssuer::new(settings.review_base_url.clone());
        let hooks = HookFanout::new()
            .with(Arc::new(LoggingHooks))
            .with(Arc::new(reviews.clone()));

        let mut system = Self::new(Arc::new(hooks));
        system.reviews = Some(reviews);

        if let Some(carrier) = &settings.carrier {
            let client = JntClient::new(carrier.clone())?;
            system = system.with_carrier(Arc::new(client), settings.tracking.clone());
        }
        if let Some(payment) = &settings.payment {
            let client = MidtransClient::new(payment)?;
            system = system.with_payment(Arc::new(client));
        }
        Ok(system)
    }

    pub fn with_payment(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payment = Some(gateway);
        self
    }

    pub fn with_carrier(mut self, carrier: Arc<dyn CarrierClient>, settings: TrackingSettings) -> Self {
        self.tracking = Some(TrackingSynchronizer::new(
            self.orders.clone(),
            carrier,
            settings,
        ));
        self
    }

    /// Starts the periodic tracking loop. Returns `false` when no carrier is configured.
    pub fn start_tracking(&mut self) -> bool {
        let Some(tracking) = self.tracking.clone() else {
            return false;
        };
        let handle = tokio::spawn(tracking.run(self.shutdown.child_token()));
        self.handles.push(handle);
        true
    }

    /// Runs one tracking pass immediately.
    pub async fn sync_tracking(&self) -> Result<SyncReport, SystemError> {
        let tracking = self.tracking.as_ref().ok_or(SystemError::TrackingDisabled)?;
        Ok(tracking.sync_tracking().await?)
    }

    /// Builds the order, then asks the payment gateway for a token.
    ///
    /// Only the order build can fail the checkout. A payment failure is logged and the receipt
    /// carries no token.
    pub async fn checkout(
        &self,
        customer_id: CustomerId,
        shipping_address: String,
        shipping_cost: Decimal,
        source: SelectionSource,
    ) -> Result<CheckoutReceipt, OrderError> {
        let order = self
            .orders
            .build_order(OrderCreate {
                customer_id,
                shipping_address,
                shipping_cost,
                source,
            })
            .await?;

        let payment = match &self.payment {
            Some(gateway) => self.request_payment(gateway.as_ref(), &order).await,
            None => None,
        };
        Ok(CheckoutReceipt { order, payment })
    }

    async fn request_payment(&self, gateway: &dyn PaymentGateway, order: &Order) -> Option<PaymentToken> {
        let customer = match self.customers.get(order.customer_id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => {
                warn!(order = %order.id, "Customer vanished before payment");
                return None;
            }
            Err(e) => {
                warn!(order = %order.id, error = %e, "Could not load customer for payment");
                return None;
            }
        };

        match gateway
            .create_token(&PaymentRequest::for_order(order, &customer))
            .await
        {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(order = %order.id, error = %e, "Payment token unavailable");
                None
            }
        }
    }

    /// Stops the tracking loop, closes every actor channel and waits for the tasks to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        self.shutdown.cancel();

        // Actors exit once every sender to them is gone.
        drop(self.tracking);
        drop(self.orders);
        drop(self.customers);
        drop(self.catalog);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
