//! HandlePaymentWebhookHandler - Reconciles gateway webhooks with payments and bookings.
//!
//! `payment.captured` is the only multi-aggregate write: completing the
//! payment and auto-confirming its booking happen in one unit of work.
//! Notifications are sent after commit and never fail the webhook.

use std::sync::Arc;

use crate::domain::booking::BookingStatus;
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCategory, PaymentId, UserId,
};
use crate::domain::payment::{
    GatewayEventType, GatewayPayment, GatewaySignatureVerifier, GatewayWebhook, Payment,
    PaymentStatus, WebhookError,
};
use crate::ports::{
    BookingRepository, PaymentNotifier, PaymentRepository, UnitOfWork, UnitOfWorkFactory,
};

use super::SystemActor;

const DEFAULT_FAILURE_REASON: &str = "Payment failed";

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the gateway signature header, if present.
    pub signature: Option<String>,
}

/// Outcome of a processed webhook. Every variant is acknowledged with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Payment completed; the booking was confirmed if it was pending.
    PaymentCaptured {
        payment_id: PaymentId,
        booking_id: BookingId,
        booking_confirmed: bool,
    },
    /// Redelivery of a capture that was already applied.
    AlreadyCompleted { payment_id: PaymentId },
    /// Payment marked as failed.
    PaymentFailed {
        payment_id: PaymentId,
        retry_attempts: u32,
    },
    /// Refund event logged, nothing persisted.
    RefundAcknowledged { refund_id: Option<String> },
    /// Event acknowledged without any change.
    Ignored { reason: String },
}

impl HandlePaymentWebhookResult {
    fn ignored(reason: impl Into<String>) -> Self {
        HandlePaymentWebhookResult::Ignored {
            reason: reason.into(),
        }
    }
}

enum CaptureOutcome {
    Captured {
        payment: Payment,
        booking_confirmed: bool,
        customer_id: Option<UserId>,
    },
    AlreadyCompleted(PaymentId),
    UnknownPayment,
}

/// Handler for payment gateway webhooks.
pub struct HandlePaymentWebhookHandler {
    verifier: GatewaySignatureVerifier,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    payments: Arc<dyn PaymentRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifier: Arc<dyn PaymentNotifier>,
    system_actor: SystemActor,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: GatewaySignatureVerifier,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        payments: Arc<dyn PaymentRepository>,
        bookings: Arc<dyn BookingRepository>,
        notifier: Arc<dyn PaymentNotifier>,
        system_actor: SystemActor,
    ) -> Self {
        Self {
            verifier,
            uow_factory,
            payments,
            bookings,
            notifier,
            system_actor,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify signature and parse
        let webhook = self
            .verifier
            .verify_and_parse(&cmd.payload, cmd.signature.as_deref())
            .map_err(|e| {
                tracing::warn!("Rejected payment webhook: {}", e);
                e
            })?;

        tracing::info!(event = %webhook.event, "Processing payment webhook");

        // 2. Dispatch
        match webhook.event_type() {
            GatewayEventType::PaymentCaptured => {
                let raw: serde_json::Value = serde_json::from_slice(&cmd.payload)
                    .map_err(|e| WebhookError::ParseError(e.to_string()))?;
                self.handle_captured(&webhook, raw).await
            }
            GatewayEventType::PaymentFailed => self.handle_failed(&webhook).await,
            GatewayEventType::RefundCreated => Ok(self.handle_refund(&webhook)),
            GatewayEventType::Unknown => {
                tracing::debug!(event = %webhook.event, "Ignoring unhandled webhook event");
                Ok(HandlePaymentWebhookResult::ignored(format!(
                    "Unhandled event {}",
                    webhook.event
                )))
            }
        }
    }

    async fn handle_captured(
        &self,
        webhook: &GatewayWebhook,
        raw: serde_json::Value,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let Some(gateway_payment) = webhook.payload.payment.as_ref() else {
            tracing::warn!("payment.captured webhook has no payment entity");
            return Ok(HandlePaymentWebhookResult::ignored("Missing payment entity"));
        };
        let Some(transaction_id) = gateway_payment.transaction_id() else {
            tracing::warn!("payment.captured webhook has no transaction id");
            return Ok(HandlePaymentWebhookResult::ignored("Missing transaction id"));
        };

        let mut uow = self.uow_factory.begin().await?;
        let outcome = self
            .capture(uow.as_mut(), gateway_payment, transaction_id, raw)
            .await;

        match outcome {
            Ok(CaptureOutcome::Captured {
                payment,
                booking_confirmed,
                customer_id,
            }) => {
                uow.commit().await?;
                tracing::info!(
                    payment_id = %payment.id(),
                    booking_id = %payment.booking_id(),
                    booking_confirmed,
                    "Payment captured"
                );

                if let Some(customer_id) = customer_id {
                    if let Err(e) = self
                        .notifier
                        .send_payment_success(&payment.booking_id(), &customer_id, payment.amount())
                        .await
                    {
                        tracing::warn!(
                            booking_id = %payment.booking_id(),
                            "Failed to send payment success notification: {}",
                            e
                        );
                    }
                }

                Ok(HandlePaymentWebhookResult::PaymentCaptured {
                    payment_id: payment.id(),
                    booking_id: payment.booking_id(),
                    booking_confirmed,
                })
            }
            Ok(CaptureOutcome::AlreadyCompleted(payment_id)) => {
                uow.rollback().await?;
                tracing::info!(payment_id = %payment_id, "Payment already completed, skipping");
                Ok(HandlePaymentWebhookResult::AlreadyCompleted { payment_id })
            }
            Ok(CaptureOutcome::UnknownPayment) => {
                uow.rollback().await?;
                tracing::warn!(transaction_id, "No payment matches captured webhook");
                Ok(HandlePaymentWebhookResult::ignored("Unknown payment"))
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::error!("Rollback after failed capture also failed: {}", rollback_err);
                }
                tracing::error!(transaction_id, "Failed to apply payment capture: {}", e);
                Err(e.into())
            }
        }
    }

    async fn capture(
        &self,
        uow: &mut dyn UnitOfWork,
        gateway_payment: &GatewayPayment,
        transaction_id: &str,
        raw: serde_json::Value,
    ) -> Result<CaptureOutcome, DomainError> {
        // 1. Resolve payment: order id first, then transaction id
        let mut found = None;
        if let Some(order_id) = gateway_payment.order_id() {
            found = uow.find_payment_by_gateway_order_id(order_id).await?;
        }
        if found.is_none() {
            found = uow.find_payment_by_gateway_transaction_id(transaction_id).await?;
        }
        let Some(mut payment) = found else {
            return Ok(CaptureOutcome::UnknownPayment);
        };

        // 2. Idempotence
        if payment.status() == PaymentStatus::Completed {
            return Ok(CaptureOutcome::AlreadyCompleted(payment.id()));
        }

        // 3. Complete the payment
        payment.mark_as_completed(gateway_payment.to_capture(transaction_id, raw))?;
        uow.update_payment(&payment).await?;

        // 4. Auto-confirm a pending booking
        let mut booking_confirmed = false;
        let customer_id = match uow.find_booking(&payment.booking_id()).await? {
            Some(mut booking) => {
                if booking.status() == BookingStatus::Pending {
                    match self.system_actor.resolve(uow).await? {
                        Some(actor) => {
                            booking.confirm(actor)?;
                            uow.update_booking(&booking).await?;
                            booking_confirmed = true;
                        }
                        None => tracing::warn!(
                            booking_id = %booking.id(),
                            actor = ?self.system_actor,
                            "System actor not found, booking left pending"
                        ),
                    }
                }
                Some(booking.customer_id())
            }
            None => {
                tracing::warn!(
                    booking_id = %payment.booking_id(),
                    "Booking for captured payment not found"
                );
                None
            }
        };

        Ok(CaptureOutcome::Captured {
            payment,
            booking_confirmed,
            customer_id,
        })
    }

    async fn handle_failed(
        &self,
        webhook: &GatewayWebhook,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let Some(gateway_payment) = webhook.payload.payment.as_ref() else {
            tracing::warn!("payment.failed webhook has no payment entity");
            return Ok(HandlePaymentWebhookResult::ignored("Missing payment entity"));
        };

        let Some(mut payment) = self.find_payment(gateway_payment).await? else {
            tracing::warn!(
                transaction_id = gateway_payment.transaction_id().unwrap_or_default(),
                "No payment matches failed webhook"
            );
            return Ok(HandlePaymentWebhookResult::ignored("Unknown payment"));
        };

        let reason = gateway_payment
            .error_description
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_FAILURE_REASON)
            .to_string();

        if let Err(e) = payment.mark_as_failed(reason.clone()) {
            if e.category() == ErrorCategory::State {
                tracing::warn!(
                    payment_id = %payment.id(),
                    status = %payment.status(),
                    "Ignoring failure notice for payment: {}",
                    e
                );
                return Ok(HandlePaymentWebhookResult::ignored(e.message));
            }
            return Err(e.into());
        }
        self.payments.update(&payment).await?;

        tracing::info!(
            payment_id = %payment.id(),
            retry_attempts = payment.retry_attempts(),
            reason = %reason,
            "Payment failed"
        );

        match self.bookings.find_by_id(&payment.booking_id()).await {
            Ok(Some(booking)) => {
                if let Err(e) = self
                    .notifier
                    .send_payment_failure(&booking.id(), &booking.customer_id(), &reason)
                    .await
                {
                    tracing::warn!(
                        booking_id = %booking.id(),
                        "Failed to send payment failure notification: {}",
                        e
                    );
                }
            }
            Ok(None) => tracing::warn!(
                booking_id = %payment.booking_id(),
                "Booking for failed payment not found"
            ),
            Err(e) => tracing::warn!("Could not load booking for failure notification: {}", e),
        }

        Ok(HandlePaymentWebhookResult::PaymentFailed {
            payment_id: payment.id(),
            retry_attempts: payment.retry_attempts(),
        })
    }

    fn handle_refund(&self, webhook: &GatewayWebhook) -> HandlePaymentWebhookResult {
        let refund = webhook.payload.refund.as_ref();
        tracing::info!(
            refund_id = refund.map(|r| r.id.as_str()).unwrap_or_default(),
            payment_id = refund.map(|r| r.payment_id.as_str()).unwrap_or_default(),
            amount = %refund.map(|r| r.amount()).unwrap_or_default(),
            "Refund webhook received"
        );
        HandlePaymentWebhookResult::RefundAcknowledged {
            refund_id: refund.map(|r| r.id.clone()),
        }
    }

    async fn find_payment(&self, gateway_payment: &GatewayPayment) -> Result<Option<Payment>, DomainError> {
        if let Some(order_id) = gateway_payment.order_id() {
            if let Some(payment) = self.payments.find_by_gateway_order_id(order_id).await? {
                return Ok(Some(payment));
            }
        }
        match gateway_payment.transaction_id() {
            Some(id) => self.payments.find_by_gateway_transaction_id(id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryStore, RecordingNotifier, SentNotification};
    use crate::domain::booking::{Booking, NewBooking};
    use crate::domain::foundation::{ActivityId, Currency, Money};
    use crate::domain::payment::sign;
    use crate::application::handlers::payment::DEFAULT_SYSTEM_ACTOR_EMAIL;
    use chrono::{Duration, NaiveTime, Utc};
    use serde_json::json;

    const SECRET: &str = "whsec_test";

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    struct Fixture {
        store: InMemoryStore,
        notifier: RecordingNotifier,
        handler: HandlePaymentWebhookHandler,
        booking: Booking,
        payment: Payment,
        system_user: UserId,
    }

    async fn fixture_with(notifier: RecordingNotifier, register_system_user: bool) -> Fixture {
        let store = InMemoryStore::new();
        let system_user = UserId::new();
        if register_system_user {
            store.register_user(DEFAULT_SYSTEM_ACTOR_EMAIL, system_user).await;
        }

        let booking = Booking::create(NewBooking {
            customer_id: UserId::new(),
            activity_id: ActivityId::new(),
            booking_date: (Utc::now() + Duration::days(5)).date_naive(),
            booking_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            participant_count: 3,
            price_per_participant: Money::from_major(990),
            currency: Currency::inr(),
        })
        .unwrap();
        BookingRepository::save(&store, &booking).await.unwrap();

        let payment = Payment::create(
            booking.id(),
            booking.total_amount(),
            Currency::inr(),
            "razorpay",
            Some("order_1".into()),
        )
        .unwrap();
        PaymentRepository::save(&store, &payment).await.unwrap();

        let handler = HandlePaymentWebhookHandler::new(
            GatewaySignatureVerifier::new(SECRET),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(notifier.clone()),
            SystemActor::default(),
        );

        Fixture {
            store,
            notifier,
            handler,
            booking,
            payment,
            system_user,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(RecordingNotifier::new(), true).await
    }

    fn signed(body: serde_json::Value) -> HandlePaymentWebhookCommand {
        let payload = serde_json::to_vec(&body).unwrap();
        let signature = sign(&payload, SECRET);
        HandlePaymentWebhookCommand { payload, signature }
    }

    fn captured(order_id: Option<&str>, transaction_id: &str) -> serde_json::Value {
        json!({
            "event": "payment.captured",
            "payload": {
                "payment": {
                    "id": transaction_id,
                    "order_id": order_id,
                    "amount": 297000,
                    "method": "card",
                    "card": { "last4": "4242", "network": "Visa" }
                }
            }
        })
    }

    async fn stored_payment(f: &Fixture) -> Payment {
        PaymentRepository::find_by_id(&f.store, &f.payment.id())
            .await
            .unwrap()
            .unwrap()
    }

    async fn stored_booking(f: &Fixture) -> Booking {
        BookingRepository::find_by_id(&f.store, &f.booking.id())
            .await
            .unwrap()
            .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature and parsing
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn rejects_bad_signature() {
        let f = fixture().await;
        let mut cmd = signed(captured(Some("order_1"), "pay_1"));
        cmd.signature = Some("deadbeef".into());

        let err = f.handler.handle(cmd).await.unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn rejects_missing_signature() {
        let f = fixture().await;
        let mut cmd = signed(captured(Some("order_1"), "pay_1"));
        cmd.signature = None;

        let err = f.handler.handle(cmd).await.unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));
    }

    #[tokio::test]
    async fn rejects_signed_garbage_as_parse_error() {
        let f = fixture().await;
        let payload = b"not json".to_vec();
        let signature = sign(&payload, SECRET);

        let err = f
            .handler
            .handle(HandlePaymentWebhookCommand { payload, signature })
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::ParseError(_)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // payment.captured
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn capture_completes_payment_and_confirms_booking() {
        let f = fixture().await;

        let result = f.handler.handle(signed(captured(Some("order_1"), "pay_1"))).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::PaymentCaptured {
                payment_id: f.payment.id(),
                booking_id: f.booking.id(),
                booking_confirmed: true,
            }
        );

        let payment = stored_payment(&f).await;
        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert_eq!(payment.gateway_transaction_id(), Some("pay_1"));
        assert_eq!(payment.card_last4(), Some("4242"));
        assert_eq!(payment.card_network(), Some("Visa"));
        assert_eq!(payment.payment_method(), Some("card"));
        assert!(payment.paid_at().is_some());
        assert!(payment.gateway_response().is_some());

        let booking = stored_booking(&f).await;
        assert_eq!(booking.status(), BookingStatus::Confirmed);
        assert_eq!(booking.confirmed_by(), Some(f.system_user));

        assert_eq!(
            f.notifier.sent().await,
            vec![SentNotification::PaymentSuccess {
                booking_id: f.booking.id(),
                user_id: f.booking.customer_id(),
                amount: f.payment.amount(),
            }]
        );
    }

    #[tokio::test]
    async fn capture_falls_back_to_transaction_id() {
        let f = fixture().await;

        // First capture links pay_1 to the payment.
        f.handler.handle(signed(captured(Some("order_1"), "pay_1"))).await.unwrap();

        // A redelivery without order id resolves by transaction id.
        let result = f.handler.handle(signed(captured(None, "pay_1"))).await.unwrap();
        assert_eq!(
            result,
            HandlePaymentWebhookResult::AlreadyCompleted {
                payment_id: f.payment.id()
            }
        );
    }

    #[tokio::test]
    async fn replayed_capture_is_a_no_op() {
        let f = fixture().await;
        let body = captured(Some("order_1"), "pay_1");

        f.handler.handle(signed(body.clone())).await.unwrap();
        let first_booking = stored_booking(&f).await;

        let result = f.handler.handle(signed(body)).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::AlreadyCompleted { .. }));
        assert_eq!(stored_booking(&f).await, first_booking);
        assert_eq!(f.notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn capture_for_unknown_payment_is_ignored() {
        let f = fixture().await;

        let result = f.handler.handle(signed(captured(Some("order_x"), "pay_x"))).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::Ignored { .. }));
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Pending);
        assert!(f.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn capture_without_transaction_id_is_ignored() {
        let f = fixture().await;

        let result = f.handler.handle(signed(captured(Some("order_1"), "  "))).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::Ignored { .. }));
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn capture_without_system_user_leaves_booking_pending() {
        let f = fixture_with(RecordingNotifier::new(), false).await;

        let result = f.handler.handle(signed(captured(Some("order_1"), "pay_1"))).await.unwrap();

        assert!(matches!(
            result,
            HandlePaymentWebhookResult::PaymentCaptured {
                booking_confirmed: false,
                ..
            }
        ));
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Completed);
        assert_eq!(stored_booking(&f).await.status(), BookingStatus::Pending);
    }

    #[tokio::test]
    async fn capture_leaves_non_pending_booking_alone() {
        let f = fixture().await;
        let mut booking = f.booking.clone();
        booking.cancel(UserId::new(), "changed plans").unwrap();
        BookingRepository::update(&f.store, &booking).await.unwrap();

        let result = f.handler.handle(signed(captured(Some("order_1"), "pay_1"))).await.unwrap();

        assert!(matches!(
            result,
            HandlePaymentWebhookResult::PaymentCaptured {
                booking_confirmed: false,
                ..
            }
        ));
        assert_eq!(stored_booking(&f).await.status(), BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_capture() {
        let f = fixture_with(RecordingNotifier::failing(), true).await;

        let result = f.handler.handle(signed(captured(Some("order_1"), "pay_1"))).await;

        assert!(result.is_ok());
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn failed_commit_rolls_back_and_is_retryable() {
        let f = fixture().await;
        f.store.set_fail_commits(true);

        let err = f
            .handler
            .handle(signed(captured(Some("order_1"), "pay_1")))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Pending);
        assert_eq!(stored_booking(&f).await.status(), BookingStatus::Pending);
        assert!(f.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn capture_of_refunded_payment_propagates_error() {
        let f = fixture().await;
        let mut payment = f.payment.clone();
        payment
            .mark_as_completed(crate::domain::payment::CapturedPayment {
                transaction_id: "pay_0".into(),
                ..Default::default()
            })
            .unwrap();
        payment.process_full_refund("rfnd_1", None).unwrap();
        PaymentRepository::update(&f.store, &payment).await.unwrap();

        let err = f
            .handler
            .handle(signed(captured(Some("order_1"), "pay_1")))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::InvalidTransition(_)));
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Refunded);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // payment.failed
    // ════════════════════════════════════════════════════════════════════════════

    fn failed(description: Option<&str>) -> serde_json::Value {
        json!({
            "event": "payment.failed",
            "payload": {
                "payment": {
                    "id": "pay_9",
                    "order_id": "order_1",
                    "amount": 297000,
                    "error_description": description
                }
            }
        })
    }

    #[tokio::test]
    async fn failure_marks_payment_failed_and_notifies() {
        let f = fixture().await;

        let result = f.handler.handle(signed(failed(Some("Card declined")))).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::PaymentFailed {
                payment_id: f.payment.id(),
                retry_attempts: 1,
            }
        );
        let payment = stored_payment(&f).await;
        assert_eq!(payment.status(), PaymentStatus::Failed);
        assert_eq!(payment.failure_reason(), Some("Card declined"));
        assert_eq!(
            f.notifier.sent().await,
            vec![SentNotification::PaymentFailure {
                booking_id: f.booking.id(),
                user_id: f.booking.customer_id(),
                reason: "Card declined".into(),
            }]
        );
    }

    #[tokio::test]
    async fn failure_without_description_uses_default_reason() {
        let f = fixture().await;

        f.handler.handle(signed(failed(None))).await.unwrap();

        assert_eq!(stored_payment(&f).await.failure_reason(), Some(DEFAULT_FAILURE_REASON));
    }

    #[tokio::test]
    async fn failure_after_capture_is_ignored() {
        let f = fixture().await;
        f.handler.handle(signed(captured(Some("order_1"), "pay_1"))).await.unwrap();

        let result = f.handler.handle(signed(failed(Some("late notice")))).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::Ignored { .. }));
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn failure_notification_errors_are_swallowed() {
        let f = fixture_with(RecordingNotifier::failing(), true).await;

        let result = f.handler.handle(signed(failed(Some("Insufficient funds")))).await;

        assert!(result.is_ok());
        assert_eq!(stored_payment(&f).await.status(), PaymentStatus::Failed);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Other events
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn refund_event_is_acknowledged_without_changes() {
        let f = fixture().await;
        let body = json!({
            "event": "refund.created",
            "payload": { "refund": { "id": "rfnd_1", "payment_id": "pay_1", "amount": 1000 } }
        });

        let result = f.handler.handle(signed(body)).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::RefundAcknowledged {
                refund_id: Some("rfnd_1".into())
            }
        );
        assert_eq!(stored_payment(&f).await, f.payment);
    }

    #[tokio::test]
    async fn unknown_event_is_ignored() {
        let f = fixture().await;
        let body = json!({ "event": "order.paid", "payload": {} });

        let result = f.handler.handle(signed(body)).await.unwrap();

        assert!(matches!(result, HandlePaymentWebhookResult::Ignored { .. }));
    }
}
