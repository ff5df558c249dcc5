//! PostgreSQL implementation of GiftCardRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    BookingId, Currency, DomainError, ErrorCode, GiftCardId, GiftCardTransactionId, Money, Timestamp,
    UserId,
};
use crate::domain::gift_card::{GiftCard, GiftCardCode, GiftCardDetails, GiftCardStatus, GiftCardTransaction};
use crate::ports::GiftCardRepository;

use super::{corrupt, db_error, opt_dt, opt_ts};

const GIFT_CARD_COLUMNS: &str = r#"
    id, code, amount, balance, currency, purchaser_id, purchaser_email, recipient_email,
    recipient_name, message, status, expires_at, redeemed_at, redeemed_by, created_at, updated_at
"#;

pub struct PostgresGiftCardRepository {
    pool: PgPool,
}

impl PostgresGiftCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GiftCardRow {
    id: Uuid,
    code: String,
    amount: i64,
    balance: i64,
    currency: String,
    purchaser_id: Option<Uuid>,
    purchaser_email: Option<String>,
    recipient_email: Option<String>,
    recipient_name: Option<String>,
    message: Option<String>,
    status: String,
    expires_at: DateTime<Utc>,
    redeemed_at: Option<DateTime<Utc>>,
    redeemed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GiftCardRow> for GiftCard {
    type Error = DomainError;

    fn try_from(row: GiftCardRow) -> Result<Self, Self::Error> {
        let code = GiftCardCode::parse(&row.code).map_err(|_| corrupt("code", &row.code))?;
        let status = GiftCardStatus::parse(&row.status).ok_or_else(|| corrupt("status", &row.status))?;
        let currency = Currency::new(&row.currency).map_err(|_| corrupt("currency", &row.currency))?;

        Ok(GiftCard {
            id: GiftCardId::from_uuid(row.id),
            code,
            amount: Money::from_minor(row.amount),
            balance: Money::from_minor(row.balance),
            currency,
            details: GiftCardDetails {
                purchaser_id: row.purchaser_id.map(UserId::from_uuid),
                purchaser_email: row.purchaser_email,
                recipient_email: row.recipient_email,
                recipient_name: row.recipient_name,
                message: row.message,
            },
            status,
            expires_at: Timestamp::from_datetime(row.expires_at),
            redeemed_at: opt_ts(row.redeemed_at),
            redeemed_by: row.redeemed_by.map(UserId::from_uuid),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GiftCardTransactionRow {
    id: Uuid,
    gift_card_id: Uuid,
    booking_id: Uuid,
    amount_used: i64,
    balance_after: i64,
    used_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<GiftCardTransactionRow> for GiftCardTransaction {
    fn from(row: GiftCardTransactionRow) -> Self {
        GiftCardTransaction::reconstitute(
            GiftCardTransactionId::from_uuid(row.id),
            GiftCardId::from_uuid(row.gift_card_id),
            BookingId::from_uuid(row.booking_id),
            Money::from_minor(row.amount_used),
            Money::from_minor(row.balance_after),
            UserId::from_uuid(row.used_by),
            Timestamp::from_datetime(row.created_at),
        )
    }
}

#[async_trait]
impl GiftCardRepository for PostgresGiftCardRepository {
    async fn save(&self, card: &GiftCard) -> Result<(), DomainError> {
        sqlx::query(&format!(
            "INSERT INTO gift_cards ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
            GIFT_CARD_COLUMNS
        ))
        .bind(card.id.as_uuid())
        .bind(card.code.as_str())
        .bind(card.amount.minor())
        .bind(card.balance.minor())
        .bind(card.currency.as_str())
        .bind(card.details.purchaser_id.map(|u| *u.as_uuid()))
        .bind(&card.details.purchaser_email)
        .bind(&card.details.recipient_email)
        .bind(&card.details.recipient_name)
        .bind(&card.details.message)
        .bind(card.status.as_str())
        .bind(card.expires_at.as_datetime())
        .bind(opt_dt(card.redeemed_at))
        .bind(card.redeemed_by.map(|u| *u.as_uuid()))
        .bind(card.created_at.as_datetime())
        .bind(card.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save gift card", e))?;

        Ok(())
    }

    async fn update(&self, card: &GiftCard) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE gift_cards SET
                balance = $2,
                status = $3,
                redeemed_at = $4,
                redeemed_by = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(card.id.as_uuid())
        .bind(card.balance.minor())
        .bind(card.status.as_str())
        .bind(opt_dt(card.redeemed_at))
        .bind(card.redeemed_by.map(|u| *u.as_uuid()))
        .bind(card.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update gift card", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::GiftCardNotFound,
                format!("Gift card not found: {}", card.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &GiftCardId) -> Result<Option<GiftCard>, DomainError> {
        let row: Option<GiftCardRow> =
            sqlx::query_as(&format!("SELECT {} FROM gift_cards WHERE id = $1", GIFT_CARD_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find gift card", e))?;

        row.map(GiftCard::try_from).transpose()
    }

    async fn find_by_code(&self, code: &GiftCardCode) -> Result<Option<GiftCard>, DomainError> {
        let row: Option<GiftCardRow> =
            sqlx::query_as(&format!("SELECT {} FROM gift_cards WHERE code = $1", GIFT_CARD_COLUMNS))
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find gift card", e))?;

        row.map(GiftCard::try_from).transpose()
    }

    async fn record_transaction(&self, transaction: &GiftCardTransaction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO gift_card_transactions (
                id, gift_card_id, booking_id, amount_used, balance_after, used_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(transaction.id().as_uuid())
        .bind(transaction.gift_card_id().as_uuid())
        .bind(transaction.booking_id().as_uuid())
        .bind(transaction.amount_used().minor())
        .bind(transaction.balance_after().minor())
        .bind(transaction.used_by().as_uuid())
        .bind(transaction.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("record gift card transaction", e))?;

        Ok(())
    }

    async fn transactions_for(&self, id: &GiftCardId) -> Result<Vec<GiftCardTransaction>, DomainError> {
        let rows: Vec<GiftCardTransactionRow> = sqlx::query_as(
            r#"
            SELECT id, gift_card_id, booking_id, amount_used, balance_after, used_by, created_at
            FROM gift_card_transactions
            WHERE gift_card_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list gift card transactions", e))?;

        Ok(rows.into_iter().map(GiftCardTransaction::from).collect())
    }
}
