//! Gift card aggregate entity.
//!
//! A stored-value instrument. Each use draws down the balance and produces
//! a [`GiftCardTransaction`] for the append-only ledger.
//!
//! # Invariants
//!
//! - `0 <= balance <= amount`
//! - status becomes Redeemed exactly when the balance reaches zero
//!
//! Expiry is applied lazily: a card past `expires_at` stays Active in storage
//! until someone tries to use it. That attempt flips it to Expired and still
//! fails, so callers must persist the card even on `GiftCardExpired`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookingId, Currency, DomainError, ErrorCode, GiftCardId, Money, StateMachine, Timestamp,
    UserId, ValidationError,
};

use super::{GiftCardCode, GiftCardStatus, GiftCardTransaction};

pub const DEFAULT_VALIDITY_DAYS: u32 = 365;
pub const MAX_VALIDITY_DAYS: u32 = 36_500;

/// Optional purchaser and recipient information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardDetails {
    pub purchaser_id: Option<UserId>,
    pub purchaser_email: Option<String>,
    pub recipient_email: Option<String>,
    pub recipient_name: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    pub(crate) id: GiftCardId,
    pub(crate) code: GiftCardCode,
    pub(crate) amount: Money,
    pub(crate) balance: Money,
    pub(crate) currency: Currency,
    pub(crate) details: GiftCardDetails,
    pub(crate) status: GiftCardStatus,
    pub(crate) expires_at: Timestamp,
    pub(crate) redeemed_at: Option<Timestamp>,
    pub(crate) redeemed_by: Option<UserId>,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
}

impl GiftCard {
    /// Issues a new active card with a generated code.
    pub fn issue(
        amount: Money,
        currency: Currency,
        details: GiftCardDetails,
        validity_days: u32,
    ) -> Result<Self, DomainError> {
        Self::issue_at(amount, currency, details, validity_days, Timestamp::now())
    }

    pub fn issue_at(
        amount: Money,
        currency: Currency,
        details: GiftCardDetails,
        validity_days: u32,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        amount.ensure_positive("amount")?;
        let out_of_range = || {
            ValidationError::out_of_range(
                "validity_days",
                1,
                i64::from(MAX_VALIDITY_DAYS),
                i64::from(validity_days),
            )
        };
        if validity_days == 0 || validity_days > MAX_VALIDITY_DAYS {
            return Err(out_of_range().into());
        }
        let expires_at = now
            .checked_add_days(i64::from(validity_days))
            .ok_or_else(out_of_range)?;

        Ok(Self {
            id: GiftCardId::new(),
            code: GiftCardCode::generate(),
            amount,
            balance: amount,
            currency,
            details,
            status: GiftCardStatus::Active,
            expires_at,
            redeemed_at: None,
            redeemed_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Draws up to `amount` from the balance for a booking.
    ///
    /// Consumes `min(amount, balance)`; the returned transaction carries the
    /// consumed amount and the balance left.
    ///
    /// # Errors
    ///
    /// - card not Active
    /// - card past expiry (the card is flipped to Expired first)
    /// - zero balance
    pub fn use_balance(
        &mut self,
        amount: Money,
        booking_id: BookingId,
        used_by: UserId,
    ) -> Result<GiftCardTransaction, DomainError> {
        self.use_balance_at(amount, booking_id, used_by, Timestamp::now())
    }

    pub fn use_balance_at(
        &mut self,
        amount: Money,
        booking_id: BookingId,
        used_by: UserId,
        now: Timestamp,
    ) -> Result<GiftCardTransaction, DomainError> {
        amount.ensure_positive("amount")?;
        match self.status {
            GiftCardStatus::Active => {}
            GiftCardStatus::Expired => return Err(self.expired_error()),
            GiftCardStatus::Redeemed => return Err(self.depleted_error()),
            GiftCardStatus::Cancelled => {
                return Err(DomainError::invalid_state(format!(
                    "Gift card {} has been cancelled",
                    self.code
                )))
            }
        }
        if now.is_after(&self.expires_at) {
            self.transition_to(GiftCardStatus::Expired)?;
            self.updated_at = now;
            return Err(self.expired_error());
        }
        if self.balance.is_zero() {
            return Err(self.depleted_error());
        }

        let used = amount.min(self.balance);
        self.balance = self.balance - used;
        if self.balance.is_zero() {
            self.transition_to(GiftCardStatus::Redeemed)?;
            self.redeemed_at = Some(now);
            self.redeemed_by = Some(used_by);
        }
        self.updated_at = now;

        Ok(GiftCardTransaction::record(
            self.id,
            booking_id,
            used,
            self.balance,
            used_by,
            now,
        ))
    }

    /// Cancels the card. Not allowed once the balance has been spent.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(GiftCardStatus::Cancelled)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Read-only check mirroring the `use_balance` guards.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Timestamp::now())
    }

    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.status == GiftCardStatus::Active
            && !now.is_after(&self.expires_at)
            && self.balance.is_positive()
    }

    fn expired_error(&self) -> DomainError {
        DomainError::new(
            ErrorCode::GiftCardExpired,
            format!("Gift card {} has expired", self.code),
        )
    }

    fn depleted_error(&self) -> DomainError {
        DomainError::new(
            ErrorCode::GiftCardDepleted,
            format!("Gift card {} has no remaining balance", self.code),
        )
    }

    fn transition_to(&mut self, target: GiftCardStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| e.with_detail("gift_card_code", self.code.to_string()))?;
        Ok(())
    }

    pub fn id(&self) -> GiftCardId {
        self.id
    }

    pub fn code(&self) -> &GiftCardCode {
        &self.code
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn details(&self) -> &GiftCardDetails {
        &self.details
    }

    pub fn status(&self) -> GiftCardStatus {
        self.status
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn redeemed_at(&self) -> Option<Timestamp> {
        self.redeemed_at
    }

    pub fn redeemed_by(&self) -> Option<UserId> {
        self.redeemed_by
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(amount_major: i64) -> GiftCard {
        GiftCard::issue(
            Money::from_major(amount_major),
            Currency::inr(),
            GiftCardDetails::default(),
            DEFAULT_VALIDITY_DAYS,
        )
        .unwrap()
    }

    fn spend(card: &mut GiftCard, major: i64) -> Result<GiftCardTransaction, DomainError> {
        card.use_balance(Money::from_major(major), BookingId::new(), UserId::new())
    }

    #[test]
    fn issue_defaults_to_full_balance_and_one_year() {
        let now = Timestamp::now();
        let card = GiftCard::issue_at(
            Money::from_major(1000),
            Currency::inr(),
            GiftCardDetails::default(),
            DEFAULT_VALIDITY_DAYS,
            now,
        )
        .unwrap();

        assert_eq!(card.balance(), card.amount());
        assert_eq!(card.status(), GiftCardStatus::Active);
        assert_eq!(card.expires_at(), now.add_days(365));
    }

    #[test]
    fn issue_rejects_zero_amount() {
        assert!(GiftCard::issue(Money::ZERO, Currency::inr(), GiftCardDetails::default(), 30).is_err());
    }

    #[test]
    fn issue_rejects_validity_outside_range() {
        for days in [0, MAX_VALIDITY_DAYS + 1, u32::MAX] {
            let err = GiftCard::issue(Money::from_major(500), Currency::inr(), GiftCardDetails::default(), days)
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::OutOfRange, "validity_days = {}", days);
        }
        assert!(
            GiftCard::issue(Money::from_major(500), Currency::inr(), GiftCardDetails::default(), MAX_VALIDITY_DAYS)
                .is_ok()
        );
    }

    #[test]
    fn spending_in_two_steps_redeems_card() {
        let mut card = card(1000);

        let first = spend(&mut card, 600).unwrap();
        assert_eq!(first.amount_used(), Money::from_major(600));
        assert_eq!(card.balance(), Money::from_major(400));
        assert_eq!(card.status(), GiftCardStatus::Active);

        let second = spend(&mut card, 400).unwrap();
        assert_eq!(second.amount_used(), Money::from_major(400));
        assert_eq!(second.balance_after(), Money::ZERO);
        assert_eq!(card.status(), GiftCardStatus::Redeemed);
        assert!(card.redeemed_at().is_some());

        let err = spend(&mut card, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::GiftCardDepleted);
    }

    #[test]
    fn over_request_consumes_only_balance() {
        let mut card = card(500);
        let txn = spend(&mut card, 800).unwrap();
        assert_eq!(txn.amount_used(), Money::from_major(500));
        assert_eq!(card.status(), GiftCardStatus::Redeemed);
    }

    #[test]
    fn use_after_expiry_flips_status_and_fails() {
        let mut card = card(1000);
        let later = card.expires_at().add_days(1);

        let err = card
            .use_balance_at(Money::from_major(100), BookingId::new(), UserId::new(), later)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::GiftCardExpired);
        assert_eq!(card.status(), GiftCardStatus::Expired);
        assert_eq!(card.balance(), Money::from_major(1000));
    }

    #[test]
    fn is_valid_does_not_mutate() {
        let card = card(1000);
        let later = card.expires_at().add_days(1);
        assert!(!card.is_valid_at(later));
        assert_eq!(card.status(), GiftCardStatus::Active);
        assert!(card.is_valid());
    }

    #[test]
    fn cancel_blocked_once_redeemed() {
        let mut card = card(100);
        spend(&mut card, 100).unwrap();
        let err = card.cancel().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn cancelled_card_cannot_be_used() {
        let mut card = card(100);
        card.cancel().unwrap();
        assert!(spend(&mut card, 10).is_err());
        assert!(!card.is_valid());
    }

    #[test]
    fn zero_amount_use_is_rejected() {
        let mut card = card(100);
        assert!(card.use_balance(Money::ZERO, BookingId::new(), UserId::new()).is_err());
    }
}
