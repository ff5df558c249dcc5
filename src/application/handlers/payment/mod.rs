//! Payment handlers.
//!
//! ## Commands
//! - Reconciling gateway webhooks (capture, failure, refund notices)
//! - Reopening a failed payment for retry

mod handle_payment_webhook;
mod retry_payment;
mod system_actor;

pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use retry_payment::{RetryPaymentCommand, RetryPaymentHandler};
pub use system_actor::{SystemActor, DEFAULT_SYSTEM_ACTOR_EMAIL};
