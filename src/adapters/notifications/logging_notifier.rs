//! Notifier that writes payment notifications to the log.
//!
//! Stands in for an email or push channel until one is wired up.

use async_trait::async_trait;

use crate::domain::foundation::{BookingId, DomainError, Money, UserId};
use crate::ports::PaymentNotifier;

#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentNotifier for LoggingNotifier {
    async fn send_payment_success(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        amount: Money,
    ) -> Result<(), DomainError> {
        tracing::info!(
            booking_id = %booking_id,
            user_id = %user_id,
            amount = %amount,
            "Payment success notification"
        );
        Ok(())
    }

    async fn send_payment_failure(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        reason: &str,
    ) -> Result<(), DomainError> {
        tracing::info!(
            booking_id = %booking_id,
            user_id = %user_id,
            reason,
            "Payment failure notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logging_notifier_never_fails() {
        let notifier = LoggingNotifier::new();
        let booking = BookingId::new();
        let user = UserId::new();
        assert!(notifier.send_payment_success(&booking, &user, Money::from_major(10)).await.is_ok());
        assert!(notifier.send_payment_failure(&booking, &user, "declined").await.is_ok());
    }
}
