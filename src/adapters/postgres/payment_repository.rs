//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::domain::foundation::{
    BookingId, Currency, DomainError, ErrorCode, Money, PaymentId, Timestamp,
};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::PaymentRepository;

use super::{corrupt, db_error, opt_dt, opt_ts, to_int, to_u32};

pub(super) const PAYMENT_COLUMNS: &str = r#"
    id, booking_id, reference, amount, currency, status, gateway, gateway_order_id,
    gateway_transaction_id, payment_method, card_last4, card_network, paid_at, failed_at,
    failure_reason, retry_attempts, refunded_amount, refund_transaction_id, refund_reason,
    refunded_at, gateway_response, created_at, updated_at
"#;

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("SELECT {} FROM payments WHERE {} = $1", PAYMENT_COLUMNS, filter))
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find payment", e))?;

        row.map(Payment::try_from).transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentRow {
    id: Uuid,
    booking_id: Uuid,
    reference: String,
    amount: i64,
    currency: String,
    status: String,
    gateway: String,
    gateway_order_id: Option<String>,
    gateway_transaction_id: Option<String>,
    payment_method: Option<String>,
    card_last4: Option<String>,
    card_network: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    failed_at: Option<DateTime<Utc>>,
    failure_reason: Option<String>,
    retry_attempts: i32,
    refunded_amount: i64,
    refund_transaction_id: Option<String>,
    refund_reason: Option<String>,
    refunded_at: Option<DateTime<Utc>>,
    gateway_response: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status = PaymentStatus::parse(&row.status).ok_or_else(|| corrupt("status", &row.status))?;
        let currency = Currency::new(&row.currency).map_err(|_| corrupt("currency", &row.currency))?;

        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            booking_id: BookingId::from_uuid(row.booking_id),
            reference: row.reference,
            amount: Money::from_minor(row.amount),
            currency,
            status,
            gateway: row.gateway,
            gateway_order_id: row.gateway_order_id,
            gateway_transaction_id: row.gateway_transaction_id,
            payment_method: row.payment_method,
            card_last4: row.card_last4,
            card_network: row.card_network,
            paid_at: opt_ts(row.paid_at),
            failed_at: opt_ts(row.failed_at),
            failure_reason: row.failure_reason,
            retry_attempts: to_u32("retry_attempts", row.retry_attempts)?,
            refunded_amount: Money::from_minor(row.refunded_amount),
            refund_transaction_id: row.refund_transaction_id,
            refund_reason: row.refund_reason,
            refunded_at: opt_ts(row.refunded_at),
            gateway_response: row.gateway_response,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Writes every mutable payment column. Shared with the unit of work.
pub(super) async fn update_payment<'e, E>(executor: E, payment: &Payment) -> Result<(), DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE payments SET
            status = $2,
            gateway_order_id = $3,
            gateway_transaction_id = $4,
            payment_method = $5,
            card_last4 = $6,
            card_network = $7,
            paid_at = $8,
            failed_at = $9,
            failure_reason = $10,
            retry_attempts = $11,
            refunded_amount = $12,
            refund_transaction_id = $13,
            refund_reason = $14,
            refunded_at = $15,
            gateway_response = $16,
            updated_at = $17
        WHERE id = $1
        "#,
    )
    .bind(payment.id.as_uuid())
    .bind(payment.status.as_str())
    .bind(&payment.gateway_order_id)
    .bind(&payment.gateway_transaction_id)
    .bind(&payment.payment_method)
    .bind(&payment.card_last4)
    .bind(&payment.card_network)
    .bind(opt_dt(payment.paid_at))
    .bind(opt_dt(payment.failed_at))
    .bind(&payment.failure_reason)
    .bind(to_int("retry_attempts", payment.retry_attempts)?)
    .bind(payment.refunded_amount.minor())
    .bind(&payment.refund_transaction_id)
    .bind(&payment.refund_reason)
    .bind(opt_dt(payment.refunded_at))
    .bind(&payment.gateway_response)
    .bind(payment.updated_at.as_datetime())
    .execute(executor)
    .await
    .map_err(|e| db_error("update payment", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::PaymentNotFound,
            format!("Payment not found: {}", payment.id),
        ));
    }
    Ok(())
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(&format!(
            "INSERT INTO payments ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
             $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)",
            PAYMENT_COLUMNS
        ))
        .bind(payment.id.as_uuid())
        .bind(payment.booking_id.as_uuid())
        .bind(&payment.reference)
        .bind(payment.amount.minor())
        .bind(payment.currency.as_str())
        .bind(payment.status.as_str())
        .bind(&payment.gateway)
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_transaction_id)
        .bind(&payment.payment_method)
        .bind(&payment.card_last4)
        .bind(&payment.card_network)
        .bind(opt_dt(payment.paid_at))
        .bind(opt_dt(payment.failed_at))
        .bind(&payment.failure_reason)
        .bind(to_int("retry_attempts", payment.retry_attempts)?)
        .bind(payment.refunded_amount.minor())
        .bind(&payment.refund_transaction_id)
        .bind(&payment.refund_reason)
        .bind(opt_dt(payment.refunded_at))
        .bind(&payment.gateway_response)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save payment", e))?;

        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        update_payment(&self.pool, payment).await
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("SELECT {} FROM payments WHERE booking_id = $1", PAYMENT_COLUMNS))
                .bind(booking_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_gateway_order_id(&self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        self.find_one("gateway_order_id", order_id).await
    }

    async fn find_by_gateway_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>, DomainError> {
        self.find_one("gateway_transaction_id", transaction_id).await
    }
}
