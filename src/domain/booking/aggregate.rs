//! Booking aggregate entity.
//!
//! A Booking is one customer's reservation of one activity occurrence. It is
//! the anchor that payments, coupon usages and gift card transactions point
//! at, but it holds none of them: relationships are lookup keys only.
//!
//! # Design Decisions
//!
//! - **Money in minor units**: every amount is a [`Money`] (i64 paise)
//! - **Validate then mutate**: a failing method leaves the booking untouched
//! - **Clock injection**: each time-sensitive method has an `_at(now)` form;
//!   the plain form reads the system clock
//! - **No-show is a cancellation**: it sets a flag and the reason "No-show"

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ActivityId, BookingId, Currency, DomainError, ErrorCode, Money, Percentage, StateMachine,
    Timestamp, UserId, ValidationError,
};

use super::{BookingReference, BookingStatus, Participant};

/// Reason recorded when a confirmed booking is marked as a no-show.
pub const NO_SHOW_REASON: &str = "No-show";

/// Input for [`Booking::create`].
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: UserId,
    pub activity_id: ActivityId,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub participant_count: u32,
    pub price_per_participant: Money,
    pub currency: Currency,
}

/// Booking aggregate.
///
/// # Invariants
///
/// - `participant_count > 0`
/// - `discount_amount <= subtotal`
/// - `total_amount == max(0, subtotal - discount_amount + tax_amount)`
/// - status changes follow [`BookingStatus`] transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub(crate) id: BookingId,
    pub(crate) reference: BookingReference,
    pub(crate) customer_id: UserId,
    pub(crate) activity_id: ActivityId,
    pub(crate) booking_date: NaiveDate,
    pub(crate) booking_time: NaiveTime,
    pub(crate) participant_count: u32,
    pub(crate) price_per_participant: Money,
    pub(crate) subtotal: Money,
    pub(crate) discount_amount: Money,
    pub(crate) tax_amount: Money,
    pub(crate) total_amount: Money,
    pub(crate) currency: Currency,
    pub(crate) coupon_code: Option<String>,
    pub(crate) coupon_discount_percentage: Option<Percentage>,
    pub(crate) status: BookingStatus,
    pub(crate) special_requests: Option<String>,
    pub(crate) participants: Vec<Participant>,
    pub(crate) confirmed_at: Option<Timestamp>,
    pub(crate) confirmed_by: Option<UserId>,
    pub(crate) cancelled_at: Option<Timestamp>,
    pub(crate) cancelled_by: Option<UserId>,
    pub(crate) cancellation_reason: Option<String>,
    pub(crate) completed_at: Option<Timestamp>,
    pub(crate) checked_in_at: Option<Timestamp>,
    pub(crate) refund_amount: Option<Money>,
    pub(crate) refunded_at: Option<Timestamp>,
    pub(crate) is_no_show: bool,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
}

impl Booking {
    /// Creates a pending booking priced at `price × participants`.
    ///
    /// # Errors
    ///
    /// - nil customer or activity id
    /// - zero participants
    /// - negative price
    /// - booking date before today
    pub fn create(input: NewBooking) -> Result<Self, DomainError> {
        Self::create_at(input, Timestamp::now())
    }

    pub fn create_at(input: NewBooking, now: Timestamp) -> Result<Self, DomainError> {
        if input.customer_id.is_nil() {
            return Err(ValidationError::empty_field("customer_id").into());
        }
        if input.activity_id.is_nil() {
            return Err(ValidationError::empty_field("activity_id").into());
        }
        if input.participant_count == 0 {
            return Err(ValidationError::out_of_range(
                "participant_count",
                1,
                i64::from(u32::MAX),
                0,
            )
            .into());
        }
        input
            .price_per_participant
            .ensure_non_negative("price_per_participant")?;
        if input.booking_date < now.date() {
            return Err(DomainError::new(
                ErrorCode::BookingDatePassed,
                format!("Booking date {} is in the past", input.booking_date),
            ));
        }

        let subtotal = input
            .price_per_participant
            .checked_mul(input.participant_count, "subtotal")?;
        Ok(Self {
            id: BookingId::new(),
            reference: BookingReference::generate(now.date()),
            customer_id: input.customer_id,
            activity_id: input.activity_id,
            booking_date: input.booking_date,
            booking_time: input.booking_time,
            participant_count: input.participant_count,
            price_per_participant: input.price_per_participant,
            subtotal,
            discount_amount: Money::ZERO,
            tax_amount: Money::ZERO,
            total_amount: subtotal,
            currency: input.currency,
            coupon_code: None,
            coupon_discount_percentage: None,
            status: BookingStatus::Pending,
            special_requests: None,
            participants: Vec::new(),
            confirmed_at: None,
            confirmed_by: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            completed_at: None,
            checked_in_at: None,
            refund_amount: None,
            refunded_at: None,
            is_no_show: false,
            created_at: now,
            updated_at: now,
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Pricing
    // ───────────────────────────────────────────────────────────────

    /// Applies a discount and recomputes the total.
    ///
    /// # Errors
    ///
    /// Negative amount, or an amount above the subtotal.
    pub fn apply_discount(
        &mut self,
        amount: Money,
        coupon_code: Option<String>,
        percentage: Option<Percentage>,
    ) -> Result<(), DomainError> {
        amount.ensure_non_negative("discount_amount")?;
        if amount > self.subtotal {
            return Err(DomainError::new(
                ErrorCode::DiscountExceedsSubtotal,
                format!(
                    "Discount {} exceeds subtotal {}",
                    amount, self.subtotal
                ),
            ));
        }

        let total = total_for(self.subtotal, amount, self.tax_amount)?;
        self.discount_amount = amount;
        self.coupon_code = coupon_code;
        self.coupon_discount_percentage = percentage;
        self.set_total(total);
        Ok(())
    }

    /// Sets the tax amount and recomputes the total.
    ///
    /// The booking is left untouched when the new total would overflow.
    pub fn apply_tax(&mut self, amount: Money) -> Result<(), DomainError> {
        amount.ensure_non_negative("tax_amount")?;
        let total = total_for(self.subtotal, self.discount_amount, amount)?;
        self.tax_amount = amount;
        self.set_total(total);
        Ok(())
    }

    /// Amount that tax is charged on.
    pub fn taxable_amount(&self) -> Money {
        self.subtotal.saturating_sub(self.discount_amount)
    }

    fn set_total(&mut self, total: Money) {
        self.total_amount = total;
        self.updated_at = Timestamp::now();
    }

    // ───────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Confirms a pending booking on behalf of `actor`.
    pub fn confirm(&mut self, actor: UserId) -> Result<(), DomainError> {
        self.confirm_at(actor, Timestamp::now())
    }

    pub fn confirm_at(&mut self, actor: UserId, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(BookingStatus::Confirmed)?;
        self.confirmed_at = Some(now);
        self.confirmed_by = Some(actor);
        self.updated_at = now;
        Ok(())
    }

    /// Completes a confirmed booking once its date has arrived.
    ///
    /// # Errors
    ///
    /// Not Confirmed, or the booking date is still in the future.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.complete_at(Timestamp::now())
    }

    pub fn complete_at(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.ensure_transition(BookingStatus::Completed)?;
        if self.booking_date > now.date() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot complete booking before {}", self.booking_date),
            ));
        }
        self.status = BookingStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Cancels a pending or confirmed booking. A reason is required.
    pub fn cancel(&mut self, actor: UserId, reason: impl Into<String>) -> Result<(), DomainError> {
        self.cancel_at(actor, reason, Timestamp::now())
    }

    pub fn cancel_at(
        &mut self,
        actor: UserId,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let reason = reason.into().trim().to_string();
        if reason.is_empty() {
            return Err(ValidationError::empty_field("cancellation_reason").into());
        }
        self.transition_to(BookingStatus::Cancelled)?;
        self.cancelled_at = Some(now);
        self.cancelled_by = Some(actor);
        self.cancellation_reason = Some(reason);
        self.updated_at = now;
        Ok(())
    }

    /// Records a refund on a cancelled booking.
    ///
    /// The booking is marked Refunded whatever the amount; partial refund
    /// tracking lives on the payment.
    pub fn process_refund(&mut self, amount: Money) -> Result<(), DomainError> {
        self.process_refund_at(amount, Timestamp::now())
    }

    pub fn process_refund_at(&mut self, amount: Money, now: Timestamp) -> Result<(), DomainError> {
        amount.ensure_non_negative("refund_amount")?;
        self.ensure_transition(BookingStatus::Refunded)?;
        if amount > self.total_amount {
            return Err(DomainError::new(
                ErrorCode::RefundExceedsAmount,
                format!(
                    "Refund {} exceeds booking total {}",
                    amount, self.total_amount
                ),
            ));
        }
        self.status = BookingStatus::Refunded;
        self.refund_amount = Some(amount);
        self.refunded_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Checks the customer in. Only allowed on the booking date itself.
    pub fn check_in(&mut self) -> Result<(), DomainError> {
        self.check_in_at(Timestamp::now())
    }

    pub fn check_in_at(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if self.status != BookingStatus::Confirmed {
            return Err(DomainError::invalid_state(format!(
                "Only confirmed bookings can be checked in (status: {})",
                self.status
            )));
        }
        if self.booking_date != now.date() {
            return Err(DomainError::new(
                ErrorCode::BookingNotOnDate,
                format!("Check-in is only possible on {}", self.booking_date),
            ));
        }
        if self.checked_in_at.is_some() {
            return Err(DomainError::invalid_state("Booking is already checked in"));
        }
        self.checked_in_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Cancels a confirmed booking as a no-show.
    ///
    /// Fails once the booking date has passed.
    pub fn mark_as_no_show(&mut self) -> Result<(), DomainError> {
        self.mark_as_no_show_at(Timestamp::now())
    }

    pub fn mark_as_no_show_at(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if self.status != BookingStatus::Confirmed {
            return Err(DomainError::invalid_state(format!(
                "Only confirmed bookings can be marked as no-show (status: {})",
                self.status
            )));
        }
        if self.booking_date < now.date() {
            return Err(DomainError::new(
                ErrorCode::BookingDatePassed,
                format!("Booking date {} has passed", self.booking_date),
            ));
        }
        self.status = BookingStatus::Cancelled;
        self.cancellation_reason = Some(NO_SHOW_REASON.to_string());
        self.cancelled_at = Some(now);
        self.is_no_show = true;
        self.updated_at = now;
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Details
    // ───────────────────────────────────────────────────────────────

    /// Adds a named participant, up to the booked participant count.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), DomainError> {
        if self.participants.len() >= self.participant_count as usize {
            return Err(DomainError::validation(
                "participants",
                format!(
                    "Booking is for {} participant(s)",
                    self.participant_count
                ),
            ));
        }
        self.participants.push(participant);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn set_special_requests(&mut self, requests: Option<String>) {
        self.special_requests = requests
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        self.updated_at = Timestamp::now();
    }

    /// Checks the move without applying it.
    fn ensure_transition(&self, target: BookingStatus) -> Result<(), DomainError> {
        self.status
            .transition_to(target)
            .map(|_| ())
            .map_err(|e| e.with_detail("booking_id", self.id.to_string()))
    }

    fn transition_to(&mut self, target: BookingStatus) -> Result<(), DomainError> {
        self.ensure_transition(target)?;
        self.status = target;
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn reference(&self) -> &BookingReference {
        &self.reference
    }

    pub fn customer_id(&self) -> UserId {
        self.customer_id
    }

    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    pub fn booking_date(&self) -> NaiveDate {
        self.booking_date
    }

    pub fn booking_time(&self) -> NaiveTime {
        self.booking_time
    }

    pub fn participant_count(&self) -> u32 {
        self.participant_count
    }

    pub fn price_per_participant(&self) -> Money {
        self.price_per_participant
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    pub fn coupon_discount_percentage(&self) -> Option<Percentage> {
        self.coupon_discount_percentage
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn confirmed_at(&self) -> Option<Timestamp> {
        self.confirmed_at
    }

    pub fn confirmed_by(&self) -> Option<UserId> {
        self.confirmed_by
    }

    pub fn cancelled_at(&self) -> Option<Timestamp> {
        self.cancelled_at
    }

    pub fn cancelled_by(&self) -> Option<UserId> {
        self.cancelled_by
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn checked_in_at(&self) -> Option<Timestamp> {
        self.checked_in_at
    }

    pub fn refund_amount(&self) -> Option<Money> {
        self.refund_amount
    }

    pub fn refunded_at(&self) -> Option<Timestamp> {
        self.refunded_at
    }

    pub fn is_no_show(&self) -> bool {
        self.is_no_show
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Subtotal less discount plus tax, floored at zero.
fn total_for(subtotal: Money, discount: Money, tax: Money) -> Result<Money, ValidationError> {
    Ok(subtotal
        .saturating_sub(discount)
        .checked_add(tax, "total_amount")?
        .max(Money::ZERO))
}
