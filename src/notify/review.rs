//! Review tokens: a single-use link sent to the customer once their order is done.

use super::{NotificationHooks, NotifyError};
use crate::model::{CustomerId, FulfillmentStatus, Order, OrderId};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub const REVIEW_TOKEN_VALIDITY_DAYS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewToken {
    pub token: Uuid,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
    pub used: bool,
}

impl ReviewToken {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(REVIEW_TOKEN_VALIDITY_DAYS)
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Unknown review token")]
    Unknown,
    #[error("Review token has already been used")]
    Used,
    #[error("Review token has expired")]
    Expired,
}

/// Issues one token per order when it reaches `done`.
#[derive(Clone)]
pub struct ReviewTokenIssuer {
    base_url: String,
    tokens: Arc<Mutex<HashMap<OrderId, ReviewToken>>>,
}

impl ReviewTokenIssuer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens: Arc::default(),
        }
    }

    fn tokens(&self) -> MutexGuard<'_, HashMap<OrderId, ReviewToken>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the order's token, creating it on first use.
    pub fn issue(&self, order: &Order) -> ReviewToken {
        self.tokens()
            .entry(order.id)
            .or_insert_with(|| ReviewToken {
                token: Uuid::new_v4(),
                order_id: order.id,
                customer_id: order.customer_id,
                created_at: Utc::now(),
                used: false,
            })
            .clone()
    }

    pub fn token_for(&self, order_id: OrderId) -> Option<ReviewToken> {
        self.tokens().get(&order_id).cloned()
    }

    pub fn review_url(&self, token: &ReviewToken) -> String {
        format!("{}/review/?token={}", self.base_url, token.token)
    }

    /// Checks a token without consuming it.
    pub fn validate(&self, token: Uuid, now: DateTime<Utc>) -> Result<ReviewToken, ReviewError> {
        let tokens = self.tokens();
        let found = tokens
            .values()
            .find(|t| t.token == token)
            .ok_or(ReviewError::Unknown)?;
        check(found, now)?;
        Ok(found.clone())
    }

    /// Marks the token used. A token can be redeemed once.
    pub fn redeem(&self, token: Uuid, now: DateTime<Utc>) -> Result<ReviewToken, ReviewError> {
        let mut tokens = self.tokens();
        let found = tokens
            .values_mut()
            .find(|t| t.token == token)
            .ok_or(ReviewError::Unknown)?;
        check(found, now)?;
        found.used = true;
        Ok(found.clone())
    }
}

fn check(token: &ReviewToken, now: DateTime<Utc>) -> Result<(), ReviewError> {
    if token.used {
        Err(ReviewError::Used)
    } else if now >= token.expires_at() {
        Err(ReviewError::Expired)
    } else {
        Ok(())
    }
}

#[async_trait]
impl NotificationHooks for ReviewTokenIssuer {
    async fn on_status_changed(
        &self,
        order: &Order,
        _from: FulfillmentStatus,
        to: FulfillmentStatus,
    ) -> Result<(), NotifyError> {
        if to == FulfillmentStatus::Done {
            let token = self.issue(order);
            info!(
                order = %order.id,
                customer = %order.customer_id,
                url = %self.review_url(&token),
                "Review invitation"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderCreate, SelectionSource};
    use rust_decimal::Decimal;

    fn order(id: u32) -> Order {
        Order::new(
            OrderId(id),
            OrderCreate {
                customer_id: CustomerId(7),
                shipping_address: "Jl. Melati 3".into(),
                shipping_cost: Decimal::ZERO,
                source: SelectionSource::Cart,
            },
        )
    }

    #[test]
    fn test_issue_is_get_or_create() {
        let issuer = ReviewTokenIssuer::new("https://shop.example/");
        let first = issuer.issue(&order(1));
        let again = issuer.issue(&order(1));
        let other = issuer.issue(&order(2));

        assert_eq!(first.token, again.token);
        assert_ne!(first.token, other.token);
        assert_eq!(
            issuer.review_url(&first),
            format!("https://shop.example/review/?token={}", first.token)
        );
    }

    #[test]
    fn test_tokens_are_single_use() {
        let issuer = ReviewTokenIssuer::new("https://shop.example");
        let token = issuer.issue(&order(1));
        let now = Utc::now();

        assert!(issuer.validate(token.token, now).is_ok());
        assert!(issuer.redeem(token.token, now).unwrap().used);
        assert_eq!(issuer.redeem(token.token, now), Err(ReviewError::Used));
        assert_eq!(issuer.redeem(Uuid::new_v4(), now), Err(ReviewError::Unknown));
    }

    #[test]
    fn test_tokens_expire_after_two_days() {
        let issuer = ReviewTokenIssuer::new("https://shop.example");
        let token = issuer.issue(&order(1));
        let later = token.created_at + Duration::days(2);

        assert!(!token.is_valid_at(later));
        assert_eq!(issuer.validate(token.token, later), Err(ReviewError::Expired));
    }

    #[tokio::test]
    async fn test_token_is_issued_only_when_done() {
        let issuer = ReviewTokenIssuer::new("https://shop.example");
        let o = order(3);

        issuer
            .on_status_changed(&o, FulfillmentStatus::Shipped, FulfillmentStatus::Delivery)
            .await
            .unwrap();
        assert_eq!(issuer.token_for(o.id), None);

        issuer
            .on_status_changed(&o, FulfillmentStatus::Delivery, FulfillmentStatus::Done)
            .await
            .unwrap();
        assert!(issuer.token_for(o.id).is_some());
    }
}
