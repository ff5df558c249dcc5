//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_payment_webhook, PaymentAppState};

/// Create the webhook router, mounted at `/api/webhooks`.
///
/// These routes carry no user authentication; each delivery is verified
/// by its signature header instead.
///
/// # Routes
/// - `POST /payment` - Handle payment gateway webhooks
pub fn webhook_routes() -> Router<PaymentAppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}
