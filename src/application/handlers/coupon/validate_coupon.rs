//! ValidateCouponHandler - Previews the discount a coupon would give.
//!
//! A query: nothing is written. A coupon that exists but cannot be used is
//! reported as [`CouponValidation::Rejected`], not as an error.

use std::sync::Arc;

use crate::domain::coupon::CouponCode;
use crate::domain::foundation::{CategoryId, DomainError, ErrorCode, Money, UserId};
use crate::ports::{CouponRepository, CouponUsageRepository};

#[derive(Debug, Clone)]
pub struct ValidateCouponQuery {
    pub code: String,
    pub order_amount: Money,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponValidation {
    Valid { discount: Money, final_amount: Money },
    Rejected { reason: ErrorCode, message: String },
}

pub struct ValidateCouponHandler {
    coupons: Arc<dyn CouponRepository>,
    coupon_usages: Arc<dyn CouponUsageRepository>,
}

impl ValidateCouponHandler {
    pub fn new(coupons: Arc<dyn CouponRepository>, coupon_usages: Arc<dyn CouponUsageRepository>) -> Self {
        Self { coupons, coupon_usages }
    }

    pub async fn handle(&self, query: ValidateCouponQuery) -> Result<CouponValidation, DomainError> {
        let code = CouponCode::try_new(&query.code)?;
        let Some(coupon) = self.coupons.find_by_code(&code).await? else {
            return Ok(rejected(ErrorCode::CouponNotFound, format!("Coupon not found: {}", code)));
        };

        if !coupon.is_valid_for_usage() {
            return Ok(rejected(
                ErrorCode::CouponNotValid,
                format!("Coupon {} is not currently valid", code),
            ));
        }
        let applicable = match query.category_id {
            Some(category) => coupon.is_applicable_to_category(category),
            None => coupon.applicable_categories().is_empty(),
        };
        if !applicable {
            return Ok(rejected(
                ErrorCode::CouponNotApplicable,
                format!("Coupon {} does not apply to this activity", code),
            ));
        }
        if self.coupon_usages.has_user_used(&coupon.id(), &query.user_id).await? {
            return Ok(rejected(
                ErrorCode::CouponAlreadyUsed,
                format!("Coupon {} has already been used", code),
            ));
        }

        let discount = coupon.calculate_discount(query.order_amount)?;
        Ok(CouponValidation::Valid {
            discount,
            final_amount: query.order_amount - discount,
        })
    }
}

fn rejected(reason: ErrorCode, message: String) -> CouponValidation {
    tracing::debug!(reason = %reason, "Coupon rejected");
    CouponValidation::Rejected { reason, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::coupon::{Coupon, CouponUsage, DiscountRule, NewCoupon};
    use crate::domain::foundation::{BookingId, Timestamp};

    async fn stored_coupon(store: &InMemoryStore, min_order: Option<Money>) -> Coupon {
        let coupon = Coupon::create(NewCoupon {
            code: CouponCode::try_new("WELCOME").unwrap(),
            description: None,
            discount: DiscountRule::fixed(Money::from_major(250)).unwrap(),
            min_order_amount: min_order,
            max_discount_amount: None,
            valid_from: Timestamp::now().add_days(-1),
            valid_until: Timestamp::now().add_days(1),
            usage_limit: None,
            applicable_categories: vec![],
        })
        .unwrap();
        CouponRepository::save(store, &coupon).await.unwrap();
        coupon
    }

    fn handler(store: &InMemoryStore) -> ValidateCouponHandler {
        ValidateCouponHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn query(amount: Money, user_id: UserId) -> ValidateCouponQuery {
        ValidateCouponQuery {
            code: "welcome".into(),
            order_amount: amount,
            user_id,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn previews_discount_and_final_amount() {
        let store = InMemoryStore::new();
        stored_coupon(&store, None).await;

        let result = handler(&store)
            .handle(query(Money::from_major(1200), UserId::new()))
            .await
            .unwrap();

        assert_eq!(
            result,
            CouponValidation::Valid {
                discount: Money::from_major(250),
                final_amount: Money::from_major(950),
            }
        );
    }

    #[tokio::test]
    async fn below_minimum_order_previews_zero_discount() {
        let store = InMemoryStore::new();
        stored_coupon(&store, Some(Money::from_major(2000))).await;

        let result = handler(&store)
            .handle(query(Money::from_major(1200), UserId::new()))
            .await
            .unwrap();

        assert_eq!(
            result,
            CouponValidation::Valid {
                discount: Money::ZERO,
                final_amount: Money::from_major(1200),
            }
        );
    }

    #[tokio::test]
    async fn unknown_code_is_rejected_not_failed() {
        let store = InMemoryStore::new();

        let result = handler(&store)
            .handle(query(Money::from_major(1200), UserId::new()))
            .await
            .unwrap();

        assert!(matches!(
            result,
            CouponValidation::Rejected { reason: ErrorCode::CouponNotFound, .. }
        ));
    }

    #[tokio::test]
    async fn used_coupon_is_rejected_for_that_user_only() {
        let store = InMemoryStore::new();
        let coupon = stored_coupon(&store, None).await;
        let user = UserId::new();
        let usage = CouponUsage::record(coupon.id(), BookingId::new(), user, Money::from_major(250));
        CouponUsageRepository::record(&store, &usage).await.unwrap();

        let used = handler(&store).handle(query(Money::from_major(1200), user)).await.unwrap();
        let fresh = handler(&store)
            .handle(query(Money::from_major(1200), UserId::new()))
            .await
            .unwrap();

        assert!(matches!(
            used,
            CouponValidation::Rejected { reason: ErrorCode::CouponAlreadyUsed, .. }
        ));
        assert!(matches!(fresh, CouponValidation::Valid { .. }));
    }
}
