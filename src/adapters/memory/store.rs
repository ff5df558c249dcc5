//! In-memory store implementing every repository port.
//!
//! Used by tests and local development. All tables live behind one lock so
//! a unit of work can apply its buffered writes in a single step.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::{Booking, BookingReference};
use crate::domain::coupon::{Coupon, CouponCode, CouponUsage};
use crate::domain::foundation::{
    BookingId, CouponId, DomainError, ErrorCode, GiftCardId, PaymentId, UserId,
};
use crate::domain::gift_card::{GiftCard, GiftCardCode, GiftCardTransaction};
use crate::domain::loyalty::{LoyaltyPoint, UserLoyaltyStatus};
use crate::domain::payment::Payment;
use crate::ports::{
    BookingRepository, CouponRepository, CouponUsageRepository, GiftCardRepository,
    LoyaltyRepository, PaymentRepository, UnitOfWork, UnitOfWorkFactory,
};

use super::unit_of_work::InMemoryUnitOfWork;

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) bookings: HashMap<BookingId, Booking>,
    pub(super) payments: HashMap<PaymentId, Payment>,
    pub(super) coupons: HashMap<CouponId, Coupon>,
    pub(super) coupon_usages: Vec<CouponUsage>,
    pub(super) gift_cards: HashMap<GiftCardId, GiftCard>,
    pub(super) gift_card_transactions: Vec<GiftCardTransaction>,
    pub(super) loyalty_statuses: HashMap<UserId, UserLoyaltyStatus>,
    pub(super) loyalty_entries: Vec<LoyaltyPoint>,
    pub(super) users: HashMap<String, UserId>,
}

impl Tables {
    pub(super) fn payment_by_order_id(&self, order_id: &str) -> Option<&Payment> {
        self.payments
            .values()
            .find(|p| p.gateway_order_id() == Some(order_id))
    }

    pub(super) fn payment_by_transaction_id(&self, transaction_id: &str) -> Option<&Payment> {
        self.payments
            .values()
            .find(|p| p.gateway_transaction_id() == Some(transaction_id))
    }
}

/// Shared in-memory backing store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(super) tables: Arc<RwLock<Tables>>,
    pub(super) fail_commits: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user account so it can be resolved by email.
    pub async fn register_user(&self, email: &str, id: UserId) {
        self.tables
            .write()
            .await
            .users
            .insert(email.to_lowercase(), id);
    }

    /// Makes every following commit fail until switched off again.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }
}

fn not_found(code: ErrorCode, what: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::new(code, format!("{} not found: {}", what, id))
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|b| b.reference() == booking.reference()) {
            return Err(DomainError::database(format!(
                "duplicate booking reference {}",
                booking.reference()
            )));
        }
        tables.bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(&booking.id()) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(not_found(ErrorCode::BookingNotFound, "Booking", booking.id())),
        }
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.tables.read().await.bookings.get(id).cloned())
    }

    async fn find_by_reference(&self, reference: &BookingReference) -> Result<Option<Booking>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .bookings
            .values()
            .find(|b| b.reference() == reference)
            .cloned())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.payments.values().any(|p| p.booking_id() == payment.booking_id()) {
            return Err(DomainError::database(format!(
                "booking {} already has a payment",
                payment.booking_id()
            )));
        }
        tables.payments.insert(payment.id(), payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.payments.get_mut(&payment.id()) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(())
            }
            None => Err(not_found(ErrorCode::PaymentNotFound, "Payment", payment.id())),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.tables.read().await.payments.get(id).cloned())
    }

    async fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .payments
            .values()
            .find(|p| p.booking_id() == *booking_id)
            .cloned())
    }

    async fn find_by_gateway_order_id(&self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self.tables.read().await.payment_by_order_id(order_id).cloned())
    }

    async fn find_by_gateway_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .payment_by_transaction_id(transaction_id)
            .cloned())
    }
}

#[async_trait]
impl CouponRepository for InMemoryStore {
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.coupons.values().any(|c| c.code() == coupon.code()) {
            return Err(DomainError::new(
                ErrorCode::DuplicateCouponCode,
                format!("Coupon code {} already exists", coupon.code()),
            ));
        }
        tables.coupons.insert(coupon.id(), coupon.clone());
        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.coupons.get_mut(&coupon.id()) {
            Some(existing) => {
                *existing = coupon.clone();
                Ok(())
            }
            None => Err(not_found(ErrorCode::CouponNotFound, "Coupon", coupon.id())),
        }
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        Ok(self.tables.read().await.coupons.get(id).cloned())
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .coupons
            .values()
            .find(|c| c.code() == code)
            .cloned())
    }
}

#[async_trait]
impl CouponUsageRepository for InMemoryStore {
    async fn record(&self, usage: &CouponUsage) -> Result<(), DomainError> {
        self.tables.write().await.coupon_usages.push(usage.clone());
        Ok(())
    }

    async fn has_user_used(&self, coupon_id: &CouponId, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .coupon_usages
            .iter()
            .any(|u| u.coupon_id() == *coupon_id && u.user_id() == *user_id))
    }

    async fn find_by_booking(&self, booking_id: &BookingId) -> Result<Vec<CouponUsage>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .coupon_usages
            .iter()
            .filter(|u| u.booking_id() == *booking_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GiftCardRepository for InMemoryStore {
    async fn save(&self, card: &GiftCard) -> Result<(), DomainError> {
        self.tables.write().await.gift_cards.insert(card.id(), card.clone());
        Ok(())
    }

    async fn update(&self, card: &GiftCard) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.gift_cards.get_mut(&card.id()) {
            Some(existing) => {
                *existing = card.clone();
                Ok(())
            }
            None => Err(not_found(ErrorCode::GiftCardNotFound, "Gift card", card.id())),
        }
    }

    async fn find_by_id(&self, id: &GiftCardId) -> Result<Option<GiftCard>, DomainError> {
        Ok(self.tables.read().await.gift_cards.get(id).cloned())
    }

    async fn find_by_code(&self, code: &GiftCardCode) -> Result<Option<GiftCard>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .gift_cards
            .values()
            .find(|c| c.code() == code)
            .cloned())
    }

    async fn record_transaction(&self, transaction: &GiftCardTransaction) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .gift_card_transactions
            .push(transaction.clone());
        Ok(())
    }

    async fn transactions_for(&self, id: &GiftCardId) -> Result<Vec<GiftCardTransaction>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .gift_card_transactions
            .iter()
            .filter(|t| t.gift_card_id() == *id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LoyaltyRepository for InMemoryStore {
    async fn find_status(&self, user_id: &UserId) -> Result<Option<UserLoyaltyStatus>, DomainError> {
        Ok(self.tables.read().await.loyalty_statuses.get(user_id).cloned())
    }

    async fn save_status(&self, status: &UserLoyaltyStatus) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .loyalty_statuses
            .insert(status.user_id(), status.clone());
        Ok(())
    }

    async fn append_entry(&self, entry: &LoyaltyPoint) -> Result<(), DomainError> {
        self.tables.write().await.loyalty_entries.push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<LoyaltyPoint>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .loyalty_entries
            .iter()
            .rev()
            .filter(|e| e.user_id() == *user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        Ok(Box::new(InMemoryUnitOfWork::new(self.clone())))
    }
}
