//! Carrier status text to fulfillment status.

use crate::model::FulfillmentStatus;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("status prefix cannot be empty")]
    EmptyPrefix,
    #[error("prefix {shadowed:?} can never match because {earlier:?} is listed before it")]
    Shadowed { earlier: String, shadowed: String },
}

/// Ordered `(prefix, status)` table; the first prefix the carrier text starts with wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMapping {
    entries: Vec<(String, FulfillmentStatus)>,
}

impl StatusMapping {
    /// Rejects tables where an earlier prefix is a prefix of a later one, since the later entry
    /// could never be selected.
    pub fn new<S: Into<String>>(
        entries: impl IntoIterator<Item = (S, FulfillmentStatus)>,
    ) -> Result<Self, MappingError> {
        let entries: Vec<(String, FulfillmentStatus)> = entries
            .into_iter()
            .map(|(prefix, status)| (prefix.into(), status))
            .collect();

        for (i, (prefix, _)) in entries.iter().enumerate() {
            if prefix.is_empty() {
                return Err(MappingError::EmptyPrefix);
            }
            if let Some((earlier, _)) = entries[..i].iter().find(|(e, _)| prefix.starts_with(e.as_str())) {
                return Err(MappingError::Shadowed {
                    earlier: earlier.clone(),
                    shadowed: prefix.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn map(&self, carrier_status: &str) -> Option<FulfillmentStatus> {
        let text = carrier_status.trim_start();
        self.entries
            .iter()
            .find(|(prefix, _)| text.starts_with(prefix.as_str()))
            .map(|(_, status)| *status)
    }

    pub fn entries(&self) -> &[(String, FulfillmentStatus)] {
        &self.entries
    }
}

impl Default for StatusMapping {
    /// J&T history texts, most specific first.
    fn default() -> Self {
        Self {
            entries: vec![
                ("Paket telah diterima oleh".to_string(), FulfillmentStatus::Shipped),
                ("Paket telah diterima".to_string(), FulfillmentStatus::Delivery),
                (
                    "Paket akan dikirim ke alamat penerima".to_string(),
                    FulfillmentStatus::OnShipping,
                ),
                ("Manifes".to_string(), FulfillmentStatus::Packing),
            ],
        }
    }
}
