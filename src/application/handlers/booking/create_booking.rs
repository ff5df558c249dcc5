//! CreateBookingHandler - Creates a booking, applying a coupon and tax when given.
//!
//! The booking, the coupon usage and the coupon counter are separate writes.
//! A failure after the booking is saved leaves the booking in place.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::booking::{Booking, NewBooking, Participant};
use crate::domain::coupon::{Coupon, CouponCode, CouponUsage};
use crate::domain::foundation::{
    ActivityId, CategoryId, Currency, DomainError, ErrorCode, Money, Percentage, UserId,
};
use crate::ports::{BookingRepository, CouponRepository, CouponUsageRepository};

#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub customer_id: UserId,
    pub activity_id: ActivityId,
    /// Category of the activity, checked against coupon restrictions.
    pub category_id: Option<CategoryId>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub participant_count: u32,
    pub price_per_participant: Money,
    pub currency: Currency,
    pub participants: Vec<Participant>,
    pub special_requests: Option<String>,
    pub coupon_code: Option<String>,
    /// Tax charged on the discounted subtotal.
    pub tax_rate: Option<Percentage>,
}

#[derive(Debug, Clone)]
pub struct CreateBookingResult {
    pub booking: Booking,
    pub coupon_discount: Money,
}

pub struct CreateBookingHandler {
    bookings: Arc<dyn BookingRepository>,
    coupons: Arc<dyn CouponRepository>,
    coupon_usages: Arc<dyn CouponUsageRepository>,
}

impl CreateBookingHandler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        coupons: Arc<dyn CouponRepository>,
        coupon_usages: Arc<dyn CouponUsageRepository>,
    ) -> Self {
        Self {
            bookings,
            coupons,
            coupon_usages,
        }
    }

    /// # Errors
    ///
    /// - validation errors from the booking itself
    /// - `CouponNotFound`, `CouponNotValid`, `CouponNotApplicable`, `CouponAlreadyUsed`
    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<CreateBookingResult, DomainError> {
        // 1. Build the booking
        let mut booking = Booking::create(NewBooking {
            customer_id: cmd.customer_id,
            activity_id: cmd.activity_id,
            booking_date: cmd.booking_date,
            booking_time: cmd.booking_time,
            participant_count: cmd.participant_count,
            price_per_participant: cmd.price_per_participant,
            currency: cmd.currency,
        })?;
        for participant in cmd.participants {
            booking.add_participant(participant)?;
        }
        booking.set_special_requests(cmd.special_requests);

        // 2. Coupon
        let mut applied = None;
        if let Some(raw_code) = cmd.coupon_code.as_deref().filter(|c| !c.trim().is_empty()) {
            let coupon = self
                .usable_coupon(raw_code, cmd.customer_id, cmd.category_id)
                .await?;
            let discount = coupon.calculate_discount(booking.subtotal())?;
            booking.apply_discount(
                discount,
                Some(coupon.code().as_str().to_string()),
                coupon.discount().as_percentage(),
            )?;
            applied = Some((coupon, discount));
        }

        // 3. Tax
        if let Some(rate) = cmd.tax_rate {
            booking.apply_tax(booking.taxable_amount().percent_of(rate))?;
        }

        // 4. Persist
        self.bookings.save(&booking).await?;

        // 5. Record coupon use
        let mut coupon_discount = Money::ZERO;
        if let Some((mut coupon, discount)) = applied {
            let usage = CouponUsage::record(coupon.id(), booking.id(), cmd.customer_id, discount);
            self.coupon_usages.record(&usage).await?;
            coupon.increment_usage()?;
            self.coupons.update(&coupon).await?;
            coupon_discount = discount;
        }

        tracing::info!(
            booking_id = %booking.id(),
            reference = %booking.reference(),
            total = %booking.total_amount(),
            "Booking created"
        );

        Ok(CreateBookingResult {
            booking,
            coupon_discount,
        })
    }

    async fn usable_coupon(
        &self,
        raw_code: &str,
        customer_id: UserId,
        category_id: Option<CategoryId>,
    ) -> Result<Coupon, DomainError> {
        let code = CouponCode::try_new(raw_code)?;
        let coupon = self.coupons.find_by_code(&code).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::CouponNotFound, format!("Coupon not found: {}", code))
        })?;

        if !coupon.is_valid_for_usage() {
            return Err(DomainError::new(
                ErrorCode::CouponNotValid,
                format!("Coupon {} is not currently valid", code),
            ));
        }

        let applicable = match category_id {
            Some(category) => coupon.is_applicable_to_category(category),
            None => coupon.applicable_categories().is_empty(),
        };
        if !applicable {
            return Err(DomainError::new(
                ErrorCode::CouponNotApplicable,
                format!("Coupon {} does not apply to this activity", code),
            ));
        }

        if self.coupon_usages.has_user_used(&coupon.id(), &customer_id).await? {
            return Err(DomainError::new(
                ErrorCode::CouponAlreadyUsed,
                format!("Coupon {} has already been used", code),
            ));
        }

        Ok(coupon)
    }
}
