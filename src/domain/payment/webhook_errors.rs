//! Webhook error types for payment gateway webhook handling.
//!
//! HTTP status codes decide whether the gateway redelivers: 2xx and 4xx are
//! final, 5xx is retried.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCategory};

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header missing or does not match the body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body is not a valid webhook payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A domain rule rejected the change.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Persistence failed; the delivery should be retried.
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else unexpected.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Returns true if the gateway should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Database(_) | WebhookError::InvalidTransition(_) | WebhookError::Internal(_)
        )
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidTransition(_)
            | WebhookError::Database(_)
            | WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        match err.category() {
            ErrorCategory::Infrastructure => WebhookError::Database(err.to_string()),
            ErrorCategory::State | ErrorCategory::BusinessRule => {
                WebhookError::InvalidTransition(err.to_string())
            }
            ErrorCategory::Validation | ErrorCategory::NotFound => {
                WebhookError::Internal(err.to_string())
            }
        }
    }
}
