//! Payment status state machine.
//!
//! Refund states are derived from the refunded amount rather than chosen by
//! the caller, see `Payment::apply_refund`.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Order created at the gateway, awaiting capture.
    Pending,

    /// Funds captured.
    Completed,

    /// Capture failed; may be retried.
    Failed,

    /// Some, but not all, of the amount was returned.
    PartiallyRefunded,

    /// The whole amount was returned.
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::PartiallyRefunded => "partially_refunded",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "partially_refunded" => Some(PaymentStatus::PartiallyRefunded),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    /// Money has been captured and not all of it returned.
    pub fn is_refundable(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::PartiallyRefunded)
    }
}

impl StateMachine for PaymentStatus {
    const SUBJECT: &'static str = "payment";

    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Completed)
                | (Pending, Failed)
                // retry, repeated failure notice, late capture
                | (Failed, Pending)
                | (Failed, Failed)
                | (Failed, Completed)
                | (Completed, PartiallyRefunded)
                | (Completed, Refunded)
                | (PartiallyRefunded, PartiallyRefunded)
                | (PartiallyRefunded, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Completed, Failed],
            Failed => vec![Pending, Failed, Completed],
            Completed => vec![PartiallyRefunded, Refunded],
            PartiallyRefunded => vec![PartiallyRefunded, Refunded],
            Refunded => vec![],
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
