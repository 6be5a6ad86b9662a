//! Midtrans Snap client.

use super::{PaymentError, PaymentGateway, PaymentRequest, PaymentToken};
use crate::config::PaymentSettings;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

pub const SNAP_SANDBOX_URL: &str = "https://app.sandbox.midtrans.com/snap/v1/transactions";
pub const SNAP_PRODUCTION_URL: &str = "https://app.midtrans.com/snap/v1/transactions";

#[derive(Serialize)]
struct TransactionDetails {
    order_id: String,
    gross_amount: i64,
}

#[derive(Serialize)]
struct ShippingAddress<'a> {
    address: &'a str,
}

#[derive(Serialize)]
struct CustomerDetails<'a> {
    first_name: &'a str,
    email: &'a str,
    shipping_address: ShippingAddress<'a>,
}

#[derive(Serialize)]
struct SnapRequest<'a> {
    transaction_details: TransactionDetails,
    customer_details: CustomerDetails<'a>,
}

#[derive(Deserialize)]
struct SnapError {
    #[serde(default)]
    error_messages: Vec<String>,
}

/// Merchant-side order reference sent to Midtrans.
pub fn snap_order_id(request: &PaymentRequest) -> String {
    format!("ORDER-{}", request.order_id.0)
}

#[derive(Clone)]
pub struct MidtransClient {
    client: Client,
    server_key: String,
    endpoint: String,
}

impl MidtransClient {
    pub fn new(settings: &PaymentSettings) -> Result<Self, PaymentError> {
        let endpoint = match (&settings.endpoint, settings.production) {
            (Some(url), _) => url.clone(),
            (None, true) => SNAP_PRODUCTION_URL.to_string(),
            (None, false) => SNAP_SANDBOX_URL.to_string(),
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Config(e.to_string()))?;
        Ok(Self {
            client,
            server_key: settings.server_key.clone(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentGateway for MidtransClient {
    #[instrument(skip(self, request), fields(order = %request.order_id))]
    async fn create_token(&self, request: &PaymentRequest) -> Result<PaymentToken, PaymentError> {
        // Snap takes IDR as a whole number.
        let gross_amount = request
            .gross_amount
            .round()
            .to_i64()
            .filter(|amount| *amount > 0)
            .ok_or(PaymentError::InvalidAmount(request.gross_amount))?;

        let body = SnapRequest {
            transaction_details: TransactionDetails {
                order_id: snap_order_id(request),
                gross_amount,
            },
            customer_details: CustomerDetails {
                first_name: &request.first_name,
                email: &request.email,
                shipping_address: ShippingAddress {
                    address: &request.shipping_address,
                },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.server_key, Some(""))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<SnapError>(&text)
                .ok()
                .filter(|e| !e.error_messages.is_empty())
                .map_or(text, |e| e.error_messages.join("; "));
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let token: PaymentToken =
            serde_json::from_str(&text).map_err(|e| PaymentError::Decode(e.to_string()))?;
        info!(order = %request.order_id, "Payment token created");
        Ok(token)
    }
}
