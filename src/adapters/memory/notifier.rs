//! Notifier double that records what was sent.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, Money, UserId};
use crate::ports::PaymentNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    PaymentSuccess {
        booking_id: BookingId,
        user_id: UserId,
        amount: Money,
    },
    PaymentFailure {
        booking_id: BookingId,
        user_id: UserId,
        reason: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<SentNotification>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier whose every send fails after recording the attempt.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.read().await.clone()
    }

    async fn push(&self, notification: SentNotification) -> Result<(), DomainError> {
        self.sent.write().await.push(notification);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(ErrorCode::NotificationError, "notification channel down"));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentNotifier for RecordingNotifier {
    async fn send_payment_success(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        amount: Money,
    ) -> Result<(), DomainError> {
        self.push(SentNotification::PaymentSuccess {
            booking_id: *booking_id,
            user_id: *user_id,
            amount,
        })
        .await
    }

    async fn send_payment_failure(
        &self,
        booking_id: &BookingId,
        user_id: &UserId,
        reason: &str,
    ) -> Result<(), DomainError> {
        self.push(SentNotification::PaymentFailure {
            booking_id: *booking_id,
            user_id: *user_id,
            reason: reason.to_string(),
        })
        .await
    }
}
