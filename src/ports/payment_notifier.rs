//! Payment notification port.
//!
//! Callers treat every send as best effort: an error is logged, never
//! propagated to the flow that triggered it.

use crate::domain::foundation::{BookingId, DomainError, Money, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait PaymentNotifier: Send + Sync {
    async fn send_payment_success(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        amount: Money,
    ) -> Result<(), DomainError>;

    async fn send_payment_failure(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        reason: &str,
    ) -> Result<(), DomainError>;
}
