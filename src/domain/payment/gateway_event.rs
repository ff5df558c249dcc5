//! Payment gateway webhook payloads.
//!
//! Only the fields the reconciliation flow reads are modelled; anything else
//! in the gateway's JSON is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

use super::CapturedPayment;

/// Top-level webhook envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayWebhook {
    /// Event name, e.g. `payment.captured`.
    pub event: String,

    #[serde(default)]
    pub payload: GatewayPayload,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<GatewayPayment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund: Option<GatewayRefund>,
}

/// Payment object as reported by the gateway.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayPayment {
    /// Gateway transaction id (`pay_...`).
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Minor currency units.
    #[serde(default)]
    pub amount: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<GatewayCard>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayRefund {
    pub id: String,
    pub payment_id: String,
    /// Minor currency units.
    pub amount: i64,
}

/// Webhook events the reconciliation flow distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEventType {
    PaymentCaptured,
    PaymentFailed,
    RefundCreated,
    Unknown,
}

impl GatewayEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "payment.captured" => Self::PaymentCaptured,
            "payment.failed" => Self::PaymentFailed,
            "refund.created" => Self::RefundCreated,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentCaptured => "payment.captured",
            Self::PaymentFailed => "payment.failed",
            Self::RefundCreated => "refund.created",
            Self::Unknown => "unknown",
        }
    }
}

impl GatewayWebhook {
    pub fn event_type(&self) -> GatewayEventType {
        GatewayEventType::parse(&self.event)
    }
}

impl GatewayPayment {
    /// Non-empty transaction id, if the gateway sent one.
    pub fn transaction_id(&self) -> Option<&str> {
        Some(self.id.trim()).filter(|id| !id.is_empty())
    }

    /// Non-empty order id, if the gateway sent one.
    pub fn order_id(&self) -> Option<&str> {
        self.order_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount)
    }

    /// Builds the capture details, keeping `raw` as the stored gateway response.
    pub fn to_capture(&self, transaction_id: &str, raw: serde_json::Value) -> CapturedPayment {
        let card = self.card.as_ref();
        CapturedPayment {
            transaction_id: transaction_id.to_string(),
            method: self.method.clone(),
            card_last4: card.and_then(|c| c.last4.clone()),
            card_network: card.and_then(|c| c.network.clone()),
            raw_response: Some(raw),
        }
    }
}

impl GatewayRefund {
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount)
    }
}
