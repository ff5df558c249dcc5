//! Buffered unit of work over [`InMemoryStore`].
//!
//! Writes are staged locally and applied to the shared tables on commit.
//! Dropping or rolling back discards them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::Ordering;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, ErrorCode, PaymentId, UserId};
use crate::domain::payment::Payment;
use crate::ports::UnitOfWork;

use super::InMemoryStore;

pub struct InMemoryUnitOfWork {
    store: InMemoryStore,
    staged_payments: HashMap<PaymentId, Payment>,
    staged_bookings: HashMap<BookingId, Booking>,
}

impl InMemoryUnitOfWork {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            staged_payments: HashMap::new(),
            staged_bookings: HashMap::new(),
        }
    }

    fn staged_payment(&self, matches: impl Fn(&Payment) -> bool) -> Option<Payment> {
        self.staged_payments.values().find(|p| matches(p)).cloned()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_payment_by_gateway_order_id(&mut self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        if let Some(p) = self.staged_payment(|p| p.gateway_order_id() == Some(order_id)) {
            return Ok(Some(p));
        }
        Ok(self
            .store
            .tables
            .read()
            .await
            .payment_by_order_id(order_id)
            .cloned())
    }

    async fn find_payment_by_gateway_transaction_id(
        &mut self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        if let Some(p) = self.staged_payment(|p| p.gateway_transaction_id() == Some(transaction_id)) {
            return Ok(Some(p));
        }
        Ok(self
            .store
            .tables
            .read()
            .await
            .payment_by_transaction_id(transaction_id)
            .cloned())
    }

    async fn find_booking(&mut self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        if let Some(b) = self.staged_bookings.get(id) {
            return Ok(Some(b.clone()));
        }
        Ok(self.store.tables.read().await.bookings.get(id).cloned())
    }

    async fn find_user_id_by_email(&mut self, email: &str) -> Result<Option<UserId>, DomainError> {
        Ok(self
            .store
            .tables
            .read()
            .await
            .users
            .get(&email.to_lowercase())
            .copied())
    }

    async fn update_payment(&mut self, payment: &Payment) -> Result<(), DomainError> {
        let exists = self.staged_payments.contains_key(&payment.id())
            || self.store.tables.read().await.payments.contains_key(&payment.id());
        if !exists {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", payment.id()),
            ));
        }
        self.staged_payments.insert(payment.id(), payment.clone());
        Ok(())
    }

    async fn update_booking(&mut self, booking: &Booking) -> Result<(), DomainError> {
        let exists = self.staged_bookings.contains_key(&booking.id())
            || self.store.tables.read().await.bookings.contains_key(&booking.id());
        if !exists {
            return Err(DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking not found: {}", booking.id()),
            ));
        }
        self.staged_bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        if self.store.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::database("commit rejected"));
        }
        let this = *self;
        let mut tables = this.store.tables.write().await;
        tables.payments.extend(this.staged_payments);
        tables.bookings.extend(this.staged_bookings);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, Money};
    use crate::ports::{PaymentRepository, UnitOfWorkFactory};

    async fn seeded() -> (InMemoryStore, Payment) {
        let store = InMemoryStore::new();
        let payment = Payment::create(
            BookingId::new(),
            Money::from_major(250),
            Currency::inr(),
            "razorpay",
            Some("order_abc".into()),
        )
        .unwrap();
        PaymentRepository::save(&store, &payment).await.unwrap();
        (store, payment)
    }

    #[tokio::test]
    async fn commit_applies_staged_writes() {
        let (store, mut payment) = seeded().await;
        let mut uow = store.begin().await.unwrap();

        payment.mark_as_failed("card declined").unwrap();
        uow.update_payment(&payment).await.unwrap();
        uow.commit().await.unwrap();

        let stored = PaymentRepository::find_by_id(&store, &payment.id()).await.unwrap().unwrap();
        assert_eq!(stored.failure_reason(), Some("card declined"));
    }

    #[tokio::test]
    async fn rollback_discards_staged_writes() {
        let (store, mut payment) = seeded().await;
        let mut uow = store.begin().await.unwrap();

        payment.mark_as_failed("card declined").unwrap();
        uow.update_payment(&payment).await.unwrap();
        uow.rollback().await.unwrap();

        let stored = PaymentRepository::find_by_id(&store, &payment.id()).await.unwrap().unwrap();
        assert!(stored.failure_reason().is_none());
    }

    #[tokio::test]
    async fn reads_see_staged_writes() {
        let (store, mut payment) = seeded().await;
        let mut uow = store.begin().await.unwrap();

        payment.mark_as_failed("timeout").unwrap();
        uow.update_payment(&payment).await.unwrap();

        let seen = uow.find_payment_by_gateway_order_id("order_abc").await.unwrap().unwrap();
        assert_eq!(seen.failure_reason(), Some("timeout"));
    }

    #[tokio::test]
    async fn failing_commit_leaves_store_untouched() {
        let (store, mut payment) = seeded().await;
        store.set_fail_commits(true);
        let mut uow = store.begin().await.unwrap();

        payment.mark_as_failed("declined").unwrap();
        uow.update_payment(&payment).await.unwrap();
        assert!(uow.commit().await.is_err());

        let stored = PaymentRepository::find_by_id(&store, &payment.id()).await.unwrap().unwrap();
        assert!(stored.failure_reason().is_none());
    }

    #[tokio::test]
    async fn updating_unknown_payment_fails() {
        let store = InMemoryStore::new();
        let payment = Payment::create(BookingId::new(), Money::from_major(1), Currency::inr(), "razorpay", None)
            .unwrap();
        let mut uow = store.begin().await.unwrap();
        let err = uow.update_payment(&payment).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
    }

    #[tokio::test]
    async fn user_lookup_ignores_case() {
        let store = InMemoryStore::new();
        let id = UserId::new();
        store.register_user("System@FunBookr.com", id).await;

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.find_user_id_by_email("system@funbookr.com").await.unwrap(), Some(id));
        assert_eq!(uow.find_user_id_by_email("nobody@funbookr.com").await.unwrap(), None);
    }
}
