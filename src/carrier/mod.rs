//! # Carrier Integration
//!
//! Shipment tracking and the logistics pass-through calls. The tracking synchronizer depends only
//! on [`CarrierClient`], so tests can drive it with an in-memory carrier.

pub mod jnt;

pub use jnt::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CarrierError {
    #[error("Carrier request failed: {0}")]
    Http(String),

    #[error("Carrier request timed out")]
    Timeout,

    #[error("Carrier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode carrier response: {0}")]
    Decode(String),

    #[error("Carrier client misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CarrierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CarrierError::Timeout
        } else if e.is_decode() {
            CarrierError::Decode(e.to_string())
        } else {
            CarrierError::Http(e.to_string())
        }
    }
}

/// One entry of a shipment's history. Only `status` is interpreted; everything else is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl TrackingEvent {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            details: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingResponse {
    #[serde(default)]
    pub awb: Option<String>,
    /// Chronological, oldest first.
    #[serde(default)]
    pub history: Vec<TrackingEvent>,
}

impl TrackingResponse {
    pub fn latest_status(&self) -> Option<&str> {
        self.history.last().map(|event| event.status.as_str())
    }
}

#[async_trait]
pub trait CarrierClient: Send + Sync {
    async fn track(&self, billcode: &str) -> Result<TrackingResponse, CarrierError>;
}
