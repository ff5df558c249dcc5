//! RefundBookingHandler - Refunds a cancelled booking and its captured payment.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, Money};
use crate::domain::payment::Payment;
use crate::ports::{BookingRepository, PaymentRepository};

use super::load_booking;

#[derive(Debug, Clone)]
pub struct RefundBookingCommand {
    pub booking_id: BookingId,
    /// Defaults to the booking total.
    pub amount: Option<Money>,
    pub refund_transaction_id: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RefundBookingResult {
    pub booking: Booking,
    /// The payment, when one was captured for the booking.
    pub payment: Option<Payment>,
}

pub struct RefundBookingHandler {
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl RefundBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { bookings, payments }
    }

    pub async fn handle(&self, cmd: RefundBookingCommand) -> Result<RefundBookingResult, DomainError> {
        // 1. Validate against the booking before touching the payment
        let mut booking = load_booking(self.bookings.as_ref(), &cmd.booking_id).await?;
        let amount = cmd.amount.unwrap_or_else(|| booking.total_amount());
        booking.process_refund(amount)?;

        // 2. Refund the captured payment, if there is one
        let mut refunded_payment = None;
        if let Some(mut payment) = self.payments.find_by_booking_id(&booking.id()).await? {
            if payment.status().is_refundable() && amount.is_positive() {
                if amount >= payment.remaining_refundable() {
                    payment.process_full_refund(cmd.refund_transaction_id.as_str(), cmd.reason.clone())?;
                } else {
                    payment.process_partial_refund(amount, cmd.refund_transaction_id.as_str(), cmd.reason.clone())?;
                }
                self.payments.update(&payment).await?;
            } else {
                tracing::warn!(
                    payment_id = %payment.id(),
                    status = %payment.status(),
                    "Payment not refundable, refunding booking only"
                );
            }
            refunded_payment = Some(payment);
        }

        // 3. Persist the booking
        self.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id(), amount = %amount, "Booking refunded");
        Ok(RefundBookingResult {
            booking,
            payment: refunded_payment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::booking::fixtures::{reload, stored_confirmed_booking};
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::{Currency, ErrorCode};
    use crate::domain::payment::{CapturedPayment, PaymentStatus};

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    async fn cancelled_booking(store: &InMemoryStore) -> Booking {
        let mut booking = stored_confirmed_booking(store, 10).await;
        booking.cancel(booking.customer_id(), "Change of plans").unwrap();
        BookingRepository::update(store, &booking).await.unwrap();
        booking
    }

    async fn captured_payment(store: &InMemoryStore, booking: &Booking) -> Payment {
        let mut payment = Payment::create(
            booking.id(),
            booking.total_amount(),
            Currency::inr(),
            "razorpay",
            Some("order_refund".into()),
        )
        .unwrap();
        payment
            .mark_as_completed(CapturedPayment {
                transaction_id: "pay_refund".into(),
                ..Default::default()
            })
            .unwrap();
        PaymentRepository::save(store, &payment).await.unwrap();
        payment
    }

    fn handler(store: &InMemoryStore) -> RefundBookingHandler {
        RefundBookingHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn command(booking: &Booking, amount: Option<Money>) -> RefundBookingCommand {
        RefundBookingCommand {
            booking_id: booking.id(),
            amount,
            refund_transaction_id: "rfnd_001".into(),
            reason: Some("Customer cancelled".into()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn full_refund_marks_booking_and_payment_refunded() {
        let store = InMemoryStore::new();
        let booking = cancelled_booking(&store).await;
        let payment = captured_payment(&store, &booking).await;

        let result = handler(&store).handle(command(&booking, None)).await.unwrap();

        assert_eq!(result.booking.status(), BookingStatus::Refunded);
        assert_eq!(result.booking.refund_amount(), Some(Money::from_major(3000)));
        let stored = PaymentRepository::find_by_id(&store, &payment.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), PaymentStatus::Refunded);
        assert_eq!(stored.refunded_amount(), Money::from_major(3000));
        assert_eq!(stored.refund_transaction_id(), Some("rfnd_001"));
    }

    #[tokio::test]
    async fn partial_refund_leaves_payment_partially_refunded() {
        let store = InMemoryStore::new();
        let booking = cancelled_booking(&store).await;
        let payment = captured_payment(&store, &booking).await;

        handler(&store)
            .handle(command(&booking, Some(Money::from_major(1000))))
            .await
            .unwrap();

        let stored = PaymentRepository::find_by_id(&store, &payment.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), PaymentStatus::PartiallyRefunded);
        assert_eq!(stored.remaining_refundable(), Money::from_major(2000));
        assert_eq!(reload(&store, &booking).await.status(), BookingStatus::Refunded);
    }

    #[tokio::test]
    async fn refund_without_payment_updates_booking_only() {
        let store = InMemoryStore::new();
        let booking = cancelled_booking(&store).await;

        let result = handler(&store).handle(command(&booking, None)).await.unwrap();

        assert!(result.payment.is_none());
        assert_eq!(reload(&store, &booking).await.status(), BookingStatus::Refunded);
    }

    #[tokio::test]
    async fn refund_above_total_touches_nothing() {
        let store = InMemoryStore::new();
        let booking = cancelled_booking(&store).await;
        let payment = captured_payment(&store, &booking).await;

        let err = handler(&store)
            .handle(command(&booking, Some(Money::from_major(5000))))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::RefundExceedsAmount);
        assert_eq!(reload(&store, &booking).await.status(), BookingStatus::Cancelled);
        let stored = PaymentRepository::find_by_id(&store, &payment.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn active_booking_cannot_be_refunded() {
        let store = InMemoryStore::new();
        let booking = stored_confirmed_booking(&store, 10).await;

        let err = handler(&store).handle(command(&booking, None)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let store = InMemoryStore::new();
        let err = handler(&store)
            .handle(RefundBookingCommand {
                booking_id: BookingId::new(),
                amount: None,
                refund_transaction_id: "rfnd_x".into(),
                reason: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BookingNotFound);
    }
}
