//! Coupon aggregate entity.
//!
//! A coupon is independent of any booking until applied. Whether a given
//! user has already redeemed it is answered by `CouponUsage` records, not by
//! the coupon itself.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CategoryId, CouponId, DomainError, ErrorCode, Money, Timestamp, ValidationError,
};

use super::{CouponCode, DiscountRule};

/// Input for [`Coupon::create`].
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: CouponCode,
    pub description: Option<String>,
    pub discount: DiscountRule,
    pub min_order_amount: Option<Money>,
    pub max_discount_amount: Option<Money>,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub usage_limit: Option<u32>,
    pub applicable_categories: Vec<CategoryId>,
}

/// Coupon aggregate.
///
/// # Invariants
///
/// - `valid_from < valid_until`
/// - `usage_limit > 0` when set
/// - percentage discounts never exceed 100 (guaranteed by [`DiscountRule`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub(crate) id: CouponId,
    pub(crate) code: CouponCode,
    pub(crate) description: Option<String>,
    pub(crate) discount: DiscountRule,
    pub(crate) min_order_amount: Option<Money>,
    pub(crate) max_discount_amount: Option<Money>,
    pub(crate) valid_from: Timestamp,
    pub(crate) valid_until: Timestamp,
    pub(crate) usage_limit: Option<u32>,
    pub(crate) used_count: u32,
    pub(crate) is_active: bool,
    pub(crate) applicable_categories: Vec<CategoryId>,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
}

impl Coupon {
    /// Creates an active coupon.
    pub fn create(input: NewCoupon) -> Result<Self, DomainError> {
        validate_window(&input.valid_from, &input.valid_until)?;
        if input.usage_limit == Some(0) {
            return Err(ValidationError::out_of_range("usage_limit", 1, i64::from(u32::MAX), 0).into());
        }
        if let Some(min) = input.min_order_amount {
            min.ensure_non_negative("min_order_amount")?;
        }
        if let Some(max) = input.max_discount_amount {
            max.ensure_positive("max_discount_amount")?;
        }

        let now = Timestamp::now();
        Ok(Self {
            id: CouponId::new(),
            code: input.code,
            description: input.description,
            discount: input.discount,
            min_order_amount: input.min_order_amount,
            max_discount_amount: input.max_discount_amount,
            valid_from: input.valid_from,
            valid_until: input.valid_until,
            usage_limit: input.usage_limit,
            used_count: 0,
            is_active: true,
            applicable_categories: input.applicable_categories,
            created_at: now,
            updated_at: now,
        })
    }

    /// Active, inside the validity window, and below the usage limit.
    pub fn is_valid_for_usage(&self) -> bool {
        self.is_valid_for_usage_at(Timestamp::now())
    }

    pub fn is_valid_for_usage_at(&self, now: Timestamp) -> bool {
        self.is_active
            && !now.is_before(&self.valid_from)
            && !now.is_after(&self.valid_until)
            && !self.is_exhausted()
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .map(|limit| self.used_count >= limit)
            .unwrap_or(false)
    }

    /// An empty category list means the coupon applies everywhere.
    pub fn is_applicable_to_category(&self, category: CategoryId) -> bool {
        self.applicable_categories.is_empty() || self.applicable_categories.contains(&category)
    }

    /// Discount this coupon gives on `order_amount`.
    ///
    /// Zero below the minimum order; otherwise capped by the maximum
    /// discount and then by the order amount itself.
    ///
    /// # Errors
    ///
    /// `CouponNotValid` when the coupon cannot currently be used.
    pub fn calculate_discount(&self, order_amount: Money) -> Result<Money, DomainError> {
        self.calculate_discount_at(order_amount, Timestamp::now())
    }

    pub fn calculate_discount_at(&self, order_amount: Money, now: Timestamp) -> Result<Money, DomainError> {
        order_amount.ensure_non_negative("order_amount")?;
        if !self.is_valid_for_usage_at(now) {
            return Err(self.not_valid_error());
        }
        if let Some(min) = self.min_order_amount {
            if order_amount < min {
                return Ok(Money::ZERO);
            }
        }

        let mut discount = self.discount.raw_discount(order_amount);
        if let Some(max) = self.max_discount_amount {
            discount = discount.min(max);
        }
        Ok(discount.min(order_amount))
    }

    /// Counts one more redemption.
    pub fn increment_usage(&mut self) -> Result<(), DomainError> {
        self.increment_usage_at(Timestamp::now())
    }

    pub fn increment_usage_at(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if !self.is_valid_for_usage_at(now) {
            return Err(self.not_valid_error());
        }
        self.used_count = self.used_count.checked_add(1).ok_or_else(|| {
            ValidationError::out_of_range("used_count", 0, i64::from(u32::MAX), i64::from(u32::MAX))
        })?;
        self.updated_at = now;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Timestamp::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Timestamp::now();
    }

    pub fn update_validity(&mut self, valid_from: Timestamp, valid_until: Timestamp) -> Result<(), DomainError> {
        validate_window(&valid_from, &valid_until)?;
        self.valid_from = valid_from;
        self.valid_until = valid_until;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn not_valid_error(&self) -> DomainError {
        DomainError::new(
            ErrorCode::CouponNotValid,
            format!("Coupon {} is not currently valid", self.code),
        )
        .with_detail("coupon_code", self.code.as_str())
    }

    pub fn id(&self) -> CouponId {
        self.id
    }

    pub fn code(&self) -> &CouponCode {
        &self.code
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn discount(&self) -> DiscountRule {
        self.discount
    }

    pub fn min_order_amount(&self) -> Option<Money> {
        self.min_order_amount
    }

    pub fn max_discount_amount(&self) -> Option<Money> {
        self.max_discount_amount
    }

    pub fn valid_from(&self) -> Timestamp {
        self.valid_from
    }

    pub fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    pub fn usage_limit(&self) -> Option<u32> {
        self.usage_limit
    }

    pub fn used_count(&self) -> u32 {
        self.used_count
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn applicable_categories(&self) -> &[CategoryId] {
        &self.applicable_categories
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

fn validate_window(from: &Timestamp, until: &Timestamp) -> Result<(), DomainError> {
    if !from.is_before(until) {
        return Err(DomainError::validation(
            "valid_until",
            "Coupon validity must end after it starts",
        ));
    }
    Ok(())
}
