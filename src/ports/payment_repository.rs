//! Payment repository port.
//!
//! Payments are looked up by the gateway's identifiers when webhooks arrive:
//! the order id first, the transaction id as a fallback.

use crate::domain::foundation::{BookingId, DomainError, PaymentId};
use crate::domain::payment::Payment;
use async_trait::async_trait;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment doesn't exist
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// A booking has at most one payment.
    async fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Option<Payment>, DomainError>;

    async fn find_by_gateway_order_id(&self, order_id: &str) -> Result<Option<Payment>, DomainError>;

    async fn find_by_gateway_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentRepository) {}
    }
}
