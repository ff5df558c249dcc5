//! Payment aggregate entity.
//!
//! One payment settles exactly one booking. The payment mirrors the
//! gateway's view of the money: capture, failure with retries, and an
//! additive refund sub-ledger.
//!
//! # Invariants
//!
//! - `0 < amount`
//! - `0 <= refunded_amount <= amount`
//! - status is `Refunded` iff `refunded_amount == amount`, and
//!   `PartiallyRefunded` iff `0 < refunded_amount < amount`

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    random_code, BookingId, Currency, DomainError, ErrorCode, Money, PaymentId, StateMachine,
    Timestamp, ValidationError,
};

use super::PaymentStatus;

/// Retries allowed after a failed capture.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Details the gateway reports when funds are captured.
#[derive(Debug, Clone, Default)]
pub struct CapturedPayment {
    pub transaction_id: String,
    pub method: Option<String>,
    pub card_last4: Option<String>,
    pub card_network: Option<String>,
    pub raw_response: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub(crate) id: PaymentId,
    pub(crate) booking_id: BookingId,
    pub(crate) reference: String,
    pub(crate) amount: Money,
    pub(crate) currency: Currency,
    pub(crate) status: PaymentStatus,
    pub(crate) gateway: String,
    pub(crate) gateway_order_id: Option<String>,
    pub(crate) gateway_transaction_id: Option<String>,
    pub(crate) payment_method: Option<String>,
    pub(crate) card_last4: Option<String>,
    pub(crate) card_network: Option<String>,
    pub(crate) paid_at: Option<Timestamp>,
    pub(crate) failed_at: Option<Timestamp>,
    pub(crate) failure_reason: Option<String>,
    pub(crate) retry_attempts: u32,
    pub(crate) refunded_amount: Money,
    pub(crate) refund_transaction_id: Option<String>,
    pub(crate) refund_reason: Option<String>,
    pub(crate) refunded_at: Option<Timestamp>,
    pub(crate) gateway_response: Option<serde_json::Value>,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
}

impl Payment {
    /// Creates a pending payment for a booking.
    ///
    /// # Errors
    ///
    /// Non-positive amount, nil booking id, or empty gateway name.
    pub fn create(
        booking_id: BookingId,
        amount: Money,
        currency: Currency,
        gateway: impl Into<String>,
        gateway_order_id: Option<String>,
    ) -> Result<Self, DomainError> {
        if booking_id.is_nil() {
            return Err(ValidationError::empty_field("booking_id").into());
        }
        amount.ensure_positive("amount")?;
        let gateway = gateway.into().trim().to_string();
        if gateway.is_empty() {
            return Err(ValidationError::empty_field("gateway").into());
        }

        let now = Timestamp::now();
        Ok(Self {
            id: PaymentId::new(),
            booking_id,
            reference: format!("PAY-{}", random_code(12)),
            amount,
            currency,
            status: PaymentStatus::Pending,
            gateway,
            gateway_order_id: gateway_order_id.filter(|id| !id.trim().is_empty()),
            gateway_transaction_id: None,
            payment_method: None,
            card_last4: None,
            card_network: None,
            paid_at: None,
            failed_at: None,
            failure_reason: None,
            retry_attempts: 0,
            refunded_amount: Money::ZERO,
            refund_transaction_id: None,
            refund_reason: None,
            refunded_at: None,
            gateway_response: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Records a successful capture.
    ///
    /// # Errors
    ///
    /// Already completed, refunded, or the transaction id is blank.
    pub fn mark_as_completed(&mut self, capture: CapturedPayment) -> Result<(), DomainError> {
        if self.status == PaymentStatus::Completed {
            return Err(DomainError::invalid_state("Payment is already completed")
                .with_detail("payment_id", self.id.to_string()));
        }
        if capture.transaction_id.trim().is_empty() {
            return Err(ValidationError::empty_field("transaction_id").into());
        }
        self.transition_to(PaymentStatus::Completed)?;

        let now = Timestamp::now();
        self.gateway_transaction_id = Some(capture.transaction_id);
        self.payment_method = capture.method;
        self.card_last4 = capture.card_last4;
        self.card_network = capture.card_network;
        if capture.raw_response.is_some() {
            self.gateway_response = capture.raw_response;
        }
        self.paid_at = Some(now);
        self.failed_at = None;
        self.failure_reason = None;
        self.updated_at = now;
        Ok(())
    }

    /// Records a failed capture and counts it against the retry budget.
    pub fn mark_as_failed(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        let reason = reason.into();
        self.transition_to(PaymentStatus::Failed)?;

        let now = Timestamp::now();
        self.failure_reason = Some(reason);
        self.failed_at = Some(now);
        self.retry_attempts = self.retry_attempts.saturating_add(1);
        self.updated_at = now;
        Ok(())
    }

    pub fn can_be_retried(&self) -> bool {
        self.status == PaymentStatus::Failed && self.retry_attempts < MAX_RETRY_ATTEMPTS
    }

    /// Moves a failed payment back to Pending.
    ///
    /// Does not check the retry budget: call [`Payment::can_be_retried`] first.
    pub fn retry(&mut self) -> Result<(), DomainError> {
        if self.status != PaymentStatus::Failed {
            return Err(DomainError::invalid_state(format!(
                "Only failed payments can be retried (status: {})",
                self.status
            )));
        }
        self.transition_to(PaymentStatus::Pending)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Refunds whatever has not been refunded yet.
    pub fn process_full_refund(
        &mut self,
        refund_transaction_id: impl Into<String>,
        reason: Option<String>,
    ) -> Result<(), DomainError> {
        self.ensure_refundable()?;
        let remaining = self.remaining_refundable();
        self.apply_refund(remaining, refund_transaction_id.into(), reason);
        Ok(())
    }

    /// Refunds part of the amount. Refunds accumulate.
    ///
    /// # Errors
    ///
    /// Not refundable, non-positive amount, or more than what remains.
    pub fn process_partial_refund(
        &mut self,
        amount: Money,
        refund_transaction_id: impl Into<String>,
        reason: Option<String>,
    ) -> Result<(), DomainError> {
        self.ensure_refundable()?;
        amount.ensure_positive("refund_amount")?;
        let remaining = self.remaining_refundable();
        if amount > remaining {
            return Err(DomainError::new(
                ErrorCode::RefundExceedsAmount,
                format!(
                    "Refund {} exceeds remaining refundable amount {}",
                    amount, remaining
                ),
            )
            .with_detail("payment_id", self.id.to_string()));
        }
        self.apply_refund(amount, refund_transaction_id.into(), reason);
        Ok(())
    }

    pub fn is_fully_refunded(&self) -> bool {
        self.refunded_amount == self.amount
    }

    pub fn is_partially_refunded(&self) -> bool {
        self.refunded_amount.is_positive() && self.refunded_amount < self.amount
    }

    pub fn remaining_refundable(&self) -> Money {
        self.amount.saturating_sub(self.refunded_amount)
    }

    fn ensure_refundable(&self) -> Result<(), DomainError> {
        if self.status.is_refundable() {
            Ok(())
        } else {
            Err(DomainError::invalid_state(format!(
                "Only completed payments can be refunded (status: {})",
                self.status
            ))
            .with_detail("payment_id", self.id.to_string()))
        }
    }

    fn apply_refund(&mut self, amount: Money, refund_transaction_id: String, reason: Option<String>) {
        let now = Timestamp::now();
        self.refunded_amount = self.refunded_amount + amount;
        self.refund_transaction_id = Some(refund_transaction_id);
        if reason.is_some() {
            self.refund_reason = reason;
        }
        self.refunded_at = Some(now);
        self.status = if self.is_fully_refunded() {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::PartiallyRefunded
        };
        self.updated_at = now;
    }

    fn transition_to(&mut self, target: PaymentStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| e.with_detail("payment_id", self.id.to_string()))?;
        Ok(())
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn booking_id(&self) -> BookingId {
        self.booking_id
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    pub fn gateway_order_id(&self) -> Option<&str> {
        self.gateway_order_id.as_deref()
    }

    pub fn gateway_transaction_id(&self) -> Option<&str> {
        self.gateway_transaction_id.as_deref()
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn card_last4(&self) -> Option<&str> {
        self.card_last4.as_deref()
    }

    pub fn card_network(&self) -> Option<&str> {
        self.card_network.as_deref()
    }

    pub fn paid_at(&self) -> Option<Timestamp> {
        self.paid_at
    }

    pub fn failed_at(&self) -> Option<Timestamp> {
        self.failed_at
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    pub fn refunded_amount(&self) -> Money {
        self.refunded_amount
    }

    pub fn refund_transaction_id(&self) -> Option<&str> {
        self.refund_transaction_id.as_deref()
    }

    pub fn refund_reason(&self) -> Option<&str> {
        self.refund_reason.as_deref()
    }

    pub fn refunded_at(&self) -> Option<Timestamp> {
        self.refunded_at
    }

    pub fn gateway_response(&self) -> Option<&serde_json::Value> {
        self.gateway_response.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
