//! HTTP adapter for payment gateway webhooks.
//!
//! - `POST /api/webhooks/payment` - Handle gateway webhooks (signature verified, no auth)

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, WebhookAckResponse};
pub use handlers::{handle_payment_webhook, PaymentAppState, WebhookApiError, SIGNATURE_HEADER};
pub use routes::webhook_routes;
