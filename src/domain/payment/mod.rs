//! Payment domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Payment aggregate with capture, retry and refund ledger
//! - `status` - PaymentStatus state machine
//! - `gateway_event` - Webhook payload types
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `webhook_errors` - Webhook error taxonomy with HTTP mapping

mod aggregate;
mod gateway_event;
mod status;
mod webhook_errors;
mod webhook_verifier;

pub use aggregate::{CapturedPayment, Payment, MAX_RETRY_ATTEMPTS};
pub use gateway_event::{
    GatewayCard, GatewayEventType, GatewayPayload, GatewayPayment, GatewayRefund, GatewayWebhook,
};
pub use status::PaymentStatus;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign, verify_signature, GatewaySignatureVerifier};
