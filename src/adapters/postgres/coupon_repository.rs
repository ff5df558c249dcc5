//! PostgreSQL implementation of CouponRepository and CouponUsageRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::coupon::{Coupon, CouponCode, CouponUsage, DiscountRule};
use crate::domain::foundation::{
    BookingId, CategoryId, CouponId, CouponUsageId, DomainError, ErrorCode, Money, Timestamp, UserId,
};
use crate::ports::{CouponRepository, CouponUsageRepository};

use super::{corrupt, db_error, opt_money, to_int, to_u32};

const COUPON_COLUMNS: &str = r#"
    id, code, description, discount_type, discount_value, min_order_amount,
    max_discount_amount, valid_from, valid_until, usage_limit, used_count, is_active,
    applicable_categories, created_at, updated_at
"#;

pub struct PostgresCouponRepository {
    pool: PgPool,
}

impl PostgresCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: Uuid,
    code: String,
    description: Option<String>,
    discount_type: String,
    discount_value: i64,
    min_order_amount: Option<i64>,
    max_discount_amount: Option<i64>,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    usage_limit: Option<i32>,
    used_count: i32,
    is_active: bool,
    applicable_categories: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = DomainError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let code = CouponCode::try_new(&row.code).map_err(|_| corrupt("code", &row.code))?;
        let discount = DiscountRule::from_parts(&row.discount_type, row.discount_value)
            .map_err(|_| corrupt("discount_type", &row.discount_type))?;

        Ok(Coupon {
            id: CouponId::from_uuid(row.id),
            code,
            description: row.description,
            discount,
            min_order_amount: opt_money(row.min_order_amount),
            max_discount_amount: opt_money(row.max_discount_amount),
            valid_from: Timestamp::from_datetime(row.valid_from),
            valid_until: Timestamp::from_datetime(row.valid_until),
            usage_limit: row.usage_limit.map(|l| to_u32("usage_limit", l)).transpose()?,
            used_count: to_u32("used_count", row.used_count)?,
            is_active: row.is_active,
            applicable_categories: row.applicable_categories.into_iter().map(CategoryId::from_uuid).collect(),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CouponUsageRow {
    id: Uuid,
    coupon_id: Uuid,
    booking_id: Uuid,
    user_id: Uuid,
    discount_amount: i64,
    used_at: DateTime<Utc>,
}

impl From<CouponUsageRow> for CouponUsage {
    fn from(row: CouponUsageRow) -> Self {
        CouponUsage::reconstitute(
            CouponUsageId::from_uuid(row.id),
            CouponId::from_uuid(row.coupon_id),
            BookingId::from_uuid(row.booking_id),
            UserId::from_uuid(row.user_id),
            Money::from_minor(row.discount_amount),
            Timestamp::from_datetime(row.used_at),
        )
    }
}

fn category_uuids(coupon: &Coupon) -> Vec<Uuid> {
    coupon.applicable_categories.iter().map(|c| *c.as_uuid()).collect()
}

#[async_trait]
impl CouponRepository for PostgresCouponRepository {
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let usage_limit = coupon
            .usage_limit
            .map(|limit| to_int("usage_limit", limit))
            .transpose()?;
        let used_count = to_int("used_count", coupon.used_count)?;
        sqlx::query(&format!(
            "INSERT INTO coupons ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            COUPON_COLUMNS
        ))
        .bind(coupon.id.as_uuid())
        .bind(coupon.code.as_str())
        .bind(&coupon.description)
        .bind(coupon.discount.kind())
        .bind(coupon.discount.raw_value())
        .bind(coupon.min_order_amount.map(|m| m.minor()))
        .bind(coupon.max_discount_amount.map(|m| m.minor()))
        .bind(coupon.valid_from.as_datetime())
        .bind(coupon.valid_until.as_datetime())
        .bind(usage_limit)
        .bind(used_count)
        .bind(coupon.is_active)
        .bind(category_uuids(coupon))
        .bind(coupon.created_at.as_datetime())
        .bind(coupon.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("coupons_code_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateCouponCode,
                        format!("Coupon code {} already exists", coupon.code),
                    );
                }
            }
            db_error("save coupon", e)
        })?;

        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let used_count = to_int("used_count", coupon.used_count)?;
        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                description = $2,
                valid_from = $3,
                valid_until = $4,
                used_count = $5,
                is_active = $6,
                applicable_categories = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(coupon.id.as_uuid())
        .bind(&coupon.description)
        .bind(coupon.valid_from.as_datetime())
        .bind(coupon.valid_until.as_datetime())
        .bind(used_count)
        .bind(coupon.is_active)
        .bind(category_uuids(coupon))
        .bind(coupon.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update coupon", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CouponNotFound,
                format!("Coupon not found: {}", coupon.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        let row: Option<CouponRow> =
            sqlx::query_as(&format!("SELECT {} FROM coupons WHERE id = $1", COUPON_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find coupon", e))?;

        row.map(Coupon::try_from).transpose()
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        let row: Option<CouponRow> =
            sqlx::query_as(&format!("SELECT {} FROM coupons WHERE code = $1", COUPON_COLUMNS))
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find coupon", e))?;

        row.map(Coupon::try_from).transpose()
    }
}

#[async_trait]
impl CouponUsageRepository for PostgresCouponRepository {
    async fn record(&self, usage: &CouponUsage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO coupon_usages (id, coupon_id, booking_id, user_id, discount_amount, used_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(usage.id().as_uuid())
        .bind(usage.coupon_id().as_uuid())
        .bind(usage.booking_id().as_uuid())
        .bind(usage.user_id().as_uuid())
        .bind(usage.discount_amount().minor())
        .bind(usage.used_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("coupon_usages_coupon_user_key") {
                    return DomainError::new(
                        ErrorCode::CouponAlreadyUsed,
                        "Coupon already used by this user",
                    );
                }
            }
            db_error("record coupon usage", e)
        })?;

        Ok(())
    }

    async fn has_user_used(&self, coupon_id: &CouponId, user_id: &UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM coupon_usages WHERE coupon_id = $1 AND user_id = $2)",
        )
        .bind(coupon_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("check coupon usage", e))
    }

    async fn find_by_booking(&self, booking_id: &BookingId) -> Result<Vec<CouponUsage>, DomainError> {
        let rows: Vec<CouponUsageRow> = sqlx::query_as(
            r#"
            SELECT id, coupon_id, booking_id, user_id, discount_amount, used_at
            FROM coupon_usages
            WHERE booking_id = $1
            ORDER BY used_at ASC
            "#,
        )
        .bind(booking_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find coupon usages", e))?;

        Ok(rows.into_iter().map(CouponUsage::from).collect())
    }
}
