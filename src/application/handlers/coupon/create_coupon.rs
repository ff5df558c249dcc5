//! CreateCouponHandler - Creates a coupon under a unique code.

use std::sync::Arc;

use crate::domain::coupon::{Coupon, CouponCode, DiscountRule, NewCoupon};
use crate::domain::foundation::{CategoryId, DomainError, ErrorCode, Money, Timestamp};
use crate::ports::CouponRepository;

#[derive(Debug, Clone)]
pub struct CreateCouponCommand {
    pub code: String,
    pub description: Option<String>,
    pub discount: DiscountRule,
    pub min_order_amount: Option<Money>,
    pub max_discount_amount: Option<Money>,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub usage_limit: Option<u32>,
    pub applicable_categories: Vec<CategoryId>,
}

pub struct CreateCouponHandler {
    coupons: Arc<dyn CouponRepository>,
}

impl CreateCouponHandler {
    pub fn new(coupons: Arc<dyn CouponRepository>) -> Self {
        Self { coupons }
    }

    /// # Errors
    ///
    /// Validation errors, or `DuplicateCouponCode` when the code is taken.
    pub async fn handle(&self, cmd: CreateCouponCommand) -> Result<Coupon, DomainError> {
        let code = CouponCode::try_new(&cmd.code)?;
        if self.coupons.find_by_code(&code).await?.is_some() {
            return Err(DomainError::new(
                ErrorCode::DuplicateCouponCode,
                format!("Coupon code already exists: {}", code),
            ));
        }

        let coupon = Coupon::create(NewCoupon {
            code,
            description: cmd.description,
            discount: cmd.discount,
            min_order_amount: cmd.min_order_amount,
            max_discount_amount: cmd.max_discount_amount,
            valid_from: cmd.valid_from,
            valid_until: cmd.valid_until,
            usage_limit: cmd.usage_limit,
            applicable_categories: cmd.applicable_categories,
        })?;
        // The store's unique constraint still catches a concurrent insert.
        self.coupons.save(&coupon).await?;

        tracing::info!(coupon_id = %coupon.id(), code = %coupon.code(), "Coupon created");
        Ok(coupon)
    }
}
