//! HTTP handler for gateway webhooks.
//!
//! Connects the Axum route to [`HandlePaymentWebhookHandler`]. The body is
//! taken as raw bytes so the signature is checked over exactly what was sent.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, SystemActor,
};
use crate::domain::payment::{GatewaySignatureVerifier, WebhookError};
use crate::ports::{BookingRepository, PaymentNotifier, PaymentRepository, UnitOfWorkFactory};

use super::dto::{ErrorResponse, WebhookAckResponse};

/// Header carrying the hex HMAC-SHA256 of the body.
pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook routes, cloned per request.
#[derive(Clone)]
pub struct PaymentAppState {
    pub verifier: GatewaySignatureVerifier,
    pub uow_factory: Arc<dyn UnitOfWorkFactory>,
    pub payments: Arc<dyn PaymentRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub notifier: Arc<dyn PaymentNotifier>,
    pub system_actor: SystemActor,
}

impl PaymentAppState {
    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.verifier.clone(),
            self.uow_factory.clone(),
            self.payments.clone(),
            self.bookings.clone(),
            self.notifier.clone(),
            self.system_actor.clone(),
        )
    }
}

/// POST /api/webhooks/payment - Handle payment gateway webhook events
pub async fn handle_payment_webhook(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAckResponse>, WebhookApiError> {
    // A missing header is reported by the handler as an invalid signature.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };
    let result = state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookAckResponse::from(&result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let error_code = match &self.0 {
            WebhookError::InvalidSignature => "INVALID_WEBHOOK_SIGNATURE",
            WebhookError::ParseError(_) => "INVALID_PAYLOAD",
            WebhookError::InvalidTransition(_) => "INVALID_STATE_TRANSITION",
            WebhookError::Database(_) => "DATABASE_ERROR",
            WebhookError::Internal(_) => "INTERNAL_ERROR",
        };
        let body = ErrorResponse::new(error_code, self.0.to_string(), self.0.is_retryable());
        (self.0.status_code(), Json(body)).into_response()
    }
}
