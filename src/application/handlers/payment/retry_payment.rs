//! RetryPaymentHandler - Moves a failed payment back to pending.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};
use crate::domain::payment::{Payment, PaymentStatus, MAX_RETRY_ATTEMPTS};
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct RetryPaymentCommand {
    pub payment_id: PaymentId,
}

pub struct RetryPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl RetryPaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// # Errors
    ///
    /// - `PaymentNotFound`
    /// - `RetryLimitReached` once the payment has failed `MAX_RETRY_ATTEMPTS` times
    /// - `InvalidStateTransition` for payments that are not failed
    pub async fn handle(&self, cmd: RetryPaymentCommand) -> Result<Payment, DomainError> {
        let mut payment = self
            .payments
            .find_by_id(&cmd.payment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PaymentNotFound,
                    format!("Payment not found: {}", cmd.payment_id),
                )
            })?;

        if !payment.can_be_retried() {
            if payment.status() == PaymentStatus::Failed {
                return Err(DomainError::new(
                    ErrorCode::RetryLimitReached,
                    format!("Payment already retried {} times", MAX_RETRY_ATTEMPTS),
                )
                .with_detail("payment_id", payment.id().to_string()));
            }
            return Err(DomainError::invalid_state(format!(
                "Only failed payments can be retried (status: {})",
                payment.status()
            )));
        }

        payment.retry()?;
        self.payments.update(&payment).await?;

        tracing::info!(
            payment_id = %payment.id(),
            retry_attempts = payment.retry_attempts(),
            "Payment reopened for retry"
        );
        Ok(payment)
    }
}
