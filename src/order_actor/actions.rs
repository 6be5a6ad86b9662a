//! Custom actions for the order actor: the fulfillment state machine.

use crate::model::{FulfillmentStatus, PaymentStatus};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Manual transition to any recognised status. `reason` is required for `not_accepted`.
    Transition {
        status: FulfillmentStatus,
        reason: Option<String>,
    },
    /// Carrier-driven transition. Orders already in a terminal state are left alone.
    ApplyTracking(FulfillmentStatus),
    /// Moves a `pending` or `awaiting_shipment` order to `collection`; other states are untouched.
    AdvanceToCollection,
    AssignBillcode(String),
    SetPaymentStatus(PaymentStatus),
}

/// Old and new fulfillment status of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: FulfillmentStatus,
    pub to: FulfillmentStatus,
}

impl TransitionOutcome {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Results from OrderActions
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    Transitioned(TransitionOutcome),
    BillcodeAssigned,
    PaymentStatusSet,
}
