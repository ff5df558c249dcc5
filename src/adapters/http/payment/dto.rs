//! HTTP DTOs for the webhook endpoint.

use serde::Serialize;

use crate::application::handlers::payment::HandlePaymentWebhookResult;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body returned with a 200 acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
    /// What the delivery did: `captured`, `already_completed`, `failed`,
    /// `refund_acknowledged` or `ignored`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&HandlePaymentWebhookResult> for WebhookAckResponse {
    fn from(result: &HandlePaymentWebhookResult) -> Self {
        let (outcome, payment_id, detail) = match result {
            HandlePaymentWebhookResult::PaymentCaptured {
                payment_id,
                booking_confirmed,
                ..
            } => (
                "captured",
                Some(payment_id.to_string()),
                booking_confirmed.then(|| "booking confirmed".to_string()),
            ),
            HandlePaymentWebhookResult::AlreadyCompleted { payment_id } => {
                ("already_completed", Some(payment_id.to_string()), None)
            }
            HandlePaymentWebhookResult::PaymentFailed {
                payment_id,
                retry_attempts,
            } => (
                "failed",
                Some(payment_id.to_string()),
                Some(format!("retry attempts: {}", retry_attempts)),
            ),
            HandlePaymentWebhookResult::RefundAcknowledged { refund_id } => {
                ("refund_acknowledged", None, refund_id.clone())
            }
            HandlePaymentWebhookResult::Ignored { reason } => ("ignored", None, Some(reason.clone())),
        };
        Self {
            received: true,
            outcome,
            payment_id,
            detail,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Whether the gateway should redeliver.
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            retryable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{BookingId, PaymentId};

    #[test]
    fn captured_result_serializes_outcome_and_payment() {
        let payment_id = PaymentId::new();
        let ack = WebhookAckResponse::from(&HandlePaymentWebhookResult::PaymentCaptured {
            payment_id,
            booking_id: BookingId::new(),
            booking_confirmed: true,
        });

        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["outcome"], "captured");
        assert_eq!(json["payment_id"], payment_id.to_string());
        assert_eq!(json["detail"], "booking confirmed");
    }

    #[test]
    fn ignored_result_omits_payment_id() {
        let ack = WebhookAckResponse::from(&HandlePaymentWebhookResult::Ignored {
            reason: "unknown event".into(),
        });

        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["outcome"], "ignored");
        assert!(json.get("payment_id").is_none());
        assert_eq!(json["received"], true);
    }
}
