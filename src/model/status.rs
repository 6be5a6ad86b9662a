//! Order status enums and their wire names.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Where an order is in the pending → shipped → done lifecycle.
///
/// Manual transitions may move between any two states; only tracking-driven transitions follow
/// the carrier mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Pending,
    AwaitingShipment,
    Collection,
    Packing,
    OnShipping,
    Shipped,
    Delivery,
    Done,
    NotAccepted,
    Cancelled,
}

impl FulfillmentStatus {
    pub const ALL: [FulfillmentStatus; 10] = [
        Self::Pending,
        Self::AwaitingShipment,
        Self::Collection,
        Self::Packing,
        Self::OnShipping,
        Self::Shipped,
        Self::Delivery,
        Self::Done,
        Self::NotAccepted,
        Self::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AwaitingShipment => "awaiting_shipment",
            Self::Collection => "collection",
            Self::Packing => "packing",
            Self::OnShipping => "on_shipping",
            Self::Shipped => "shipped",
            Self::Delivery => "delivery",
            Self::Done => "done",
            Self::NotAccepted => "not_accepted",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::NotAccepted | Self::Cancelled)
    }

    /// States the bulk "start collecting" operation picks up.
    pub const fn awaits_collection(&self) -> bool {
        matches!(self, Self::Pending | Self::AwaitingShipment)
    }
}

impl Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FulfillmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status: {0:?}")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names_round_trip_through_from_str() {
        for status in FulfillmentStatus::ALL {
            assert_eq!(status.as_str().parse::<FulfillmentStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!("shipping".parse::<FulfillmentStatus>().is_err());
        assert!("Done".parse::<FulfillmentStatus>().is_err());
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = FulfillmentStatus::ALL
            .into_iter()
            .filter(FulfillmentStatus::is_terminal)
            .collect();
        assert_eq!(
            terminal,
            vec![
                FulfillmentStatus::Done,
                FulfillmentStatus::NotAccepted,
                FulfillmentStatus::Cancelled
            ]
        );
    }
}
