//! PostgreSQL implementation of BookingRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingReference, BookingStatus, Participant};
use crate::domain::foundation::{
    ActivityId, BookingId, Currency, DomainError, ErrorCode, Money, Percentage, Timestamp, UserId,
};
use crate::ports::BookingRepository;

use super::{corrupt, db_error, opt_dt, opt_money, opt_ts, to_int, to_u32};

pub(super) const BOOKING_COLUMNS: &str = r#"
    id, reference, customer_id, activity_id, booking_date, booking_time,
    participant_count, price_per_participant, subtotal, discount_amount, tax_amount,
    total_amount, currency, coupon_code, coupon_discount_percentage, status,
    special_requests, participants, confirmed_at, confirmed_by, cancelled_at,
    cancelled_by, cancellation_reason, completed_at, checked_in_at, refund_amount,
    refunded_at, is_no_show, created_at, updated_at
"#;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct BookingRow {
    id: Uuid,
    reference: String,
    customer_id: Uuid,
    activity_id: Uuid,
    booking_date: NaiveDate,
    booking_time: NaiveTime,
    participant_count: i32,
    price_per_participant: i64,
    subtotal: i64,
    discount_amount: i64,
    tax_amount: i64,
    total_amount: i64,
    currency: String,
    coupon_code: Option<String>,
    coupon_discount_percentage: Option<i16>,
    status: String,
    special_requests: Option<String>,
    participants: Json<Vec<Participant>>,
    confirmed_at: Option<DateTime<Utc>>,
    confirmed_by: Option<Uuid>,
    cancelled_at: Option<DateTime<Utc>>,
    cancelled_by: Option<Uuid>,
    cancellation_reason: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    checked_in_at: Option<DateTime<Utc>>,
    refund_amount: Option<i64>,
    refunded_at: Option<DateTime<Utc>>,
    is_no_show: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status).ok_or_else(|| corrupt("status", &row.status))?;
        let reference = BookingReference::parse(&row.reference).map_err(|_| corrupt("reference", &row.reference))?;
        let currency = Currency::new(&row.currency).map_err(|_| corrupt("currency", &row.currency))?;
        let coupon_discount_percentage = row
            .coupon_discount_percentage
            .map(|p| {
                u8::try_from(p)
                    .ok()
                    .and_then(|v| Percentage::try_new(v).ok())
                    .ok_or_else(|| corrupt("coupon_discount_percentage", p))
            })
            .transpose()?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            reference,
            customer_id: UserId::from_uuid(row.customer_id),
            activity_id: ActivityId::from_uuid(row.activity_id),
            booking_date: row.booking_date,
            booking_time: row.booking_time,
            participant_count: to_u32("participant_count", row.participant_count)?,
            price_per_participant: Money::from_minor(row.price_per_participant),
            subtotal: Money::from_minor(row.subtotal),
            discount_amount: Money::from_minor(row.discount_amount),
            tax_amount: Money::from_minor(row.tax_amount),
            total_amount: Money::from_minor(row.total_amount),
            currency,
            coupon_code: row.coupon_code,
            coupon_discount_percentage,
            status,
            special_requests: row.special_requests,
            participants: row.participants.0,
            confirmed_at: opt_ts(row.confirmed_at),
            confirmed_by: row.confirmed_by.map(UserId::from_uuid),
            cancelled_at: opt_ts(row.cancelled_at),
            cancelled_by: row.cancelled_by.map(UserId::from_uuid),
            cancellation_reason: row.cancellation_reason,
            completed_at: opt_ts(row.completed_at),
            checked_in_at: opt_ts(row.checked_in_at),
            refund_amount: opt_money(row.refund_amount),
            refunded_at: opt_ts(row.refunded_at),
            is_no_show: row.is_no_show,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Writes every mutable booking column. Shared with the unit of work.
pub(super) async fn update_booking<'e, E>(executor: E, booking: &Booking) -> Result<(), DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let participant_count = to_int("participant_count", booking.participant_count)?;
    let result = sqlx::query(
        r#"
        UPDATE bookings SET
            participant_count = $2,
            subtotal = $3,
            discount_amount = $4,
            tax_amount = $5,
            total_amount = $6,
            coupon_code = $7,
            coupon_discount_percentage = $8,
            status = $9,
            special_requests = $10,
            participants = $11,
            confirmed_at = $12,
            confirmed_by = $13,
            cancelled_at = $14,
            cancelled_by = $15,
            cancellation_reason = $16,
            completed_at = $17,
            checked_in_at = $18,
            refund_amount = $19,
            refunded_at = $20,
            is_no_show = $21,
            updated_at = $22
        WHERE id = $1
        "#,
    )
    .bind(booking.id.as_uuid())
    .bind(participant_count)
    .bind(booking.subtotal.minor())
    .bind(booking.discount_amount.minor())
    .bind(booking.tax_amount.minor())
    .bind(booking.total_amount.minor())
    .bind(&booking.coupon_code)
    .bind(booking.coupon_discount_percentage.map(|p| i16::from(p.value())))
    .bind(booking.status.as_str())
    .bind(&booking.special_requests)
    .bind(Json(&booking.participants))
    .bind(opt_dt(booking.confirmed_at))
    .bind(booking.confirmed_by.map(|u| *u.as_uuid()))
    .bind(opt_dt(booking.cancelled_at))
    .bind(booking.cancelled_by.map(|u| *u.as_uuid()))
    .bind(&booking.cancellation_reason)
    .bind(opt_dt(booking.completed_at))
    .bind(opt_dt(booking.checked_in_at))
    .bind(booking.refund_amount.map(|m| m.minor()))
    .bind(opt_dt(booking.refunded_at))
    .bind(booking.is_no_show)
    .bind(booking.updated_at.as_datetime())
    .execute(executor)
    .await
    .map_err(|e| db_error("update booking", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::BookingNotFound,
            format!("Booking not found: {}", booking.id),
        ));
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let participant_count = to_int("participant_count", booking.participant_count)?;
        sqlx::query(&format!(
            "INSERT INTO bookings ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
             $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30)",
            BOOKING_COLUMNS
        ))
        .bind(booking.id.as_uuid())
        .bind(booking.reference.as_str())
        .bind(booking.customer_id.as_uuid())
        .bind(booking.activity_id.as_uuid())
        .bind(booking.booking_date)
        .bind(booking.booking_time)
        .bind(participant_count)
        .bind(booking.price_per_participant.minor())
        .bind(booking.subtotal.minor())
        .bind(booking.discount_amount.minor())
        .bind(booking.tax_amount.minor())
        .bind(booking.total_amount.minor())
        .bind(booking.currency.as_str())
        .bind(&booking.coupon_code)
        .bind(booking.coupon_discount_percentage.map(|p| i16::from(p.value())))
        .bind(booking.status.as_str())
        .bind(&booking.special_requests)
        .bind(Json(&booking.participants))
        .bind(opt_dt(booking.confirmed_at))
        .bind(booking.confirmed_by.map(|u| *u.as_uuid()))
        .bind(opt_dt(booking.cancelled_at))
        .bind(booking.cancelled_by.map(|u| *u.as_uuid()))
        .bind(&booking.cancellation_reason)
        .bind(opt_dt(booking.completed_at))
        .bind(opt_dt(booking.checked_in_at))
        .bind(booking.refund_amount.map(|m| m.minor()))
        .bind(opt_dt(booking.refunded_at))
        .bind(booking.is_no_show)
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save booking", e))?;

        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        update_booking(&self.pool, booking).await
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find booking", e))?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_by_reference(&self, reference: &BookingReference) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings WHERE reference = $1", BOOKING_COLUMNS))
                .bind(reference.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find booking", e))?;

        row.map(Booking::try_from).transpose()
    }
}
