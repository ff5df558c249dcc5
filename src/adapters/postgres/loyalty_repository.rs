//! PostgreSQL implementation of LoyaltyRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{BookingId, DomainError, LoyaltyPointId, Timestamp, UserId};
use crate::domain::loyalty::{LoyaltyPoint, LoyaltyPointKind, LoyaltyTier, UserLoyaltyStatus};
use crate::ports::LoyaltyRepository;

use super::{corrupt, db_error, opt_dt, opt_ts, to_u64};

pub struct PostgresLoyaltyRepository {
    pool: PgPool,
}

impl PostgresLoyaltyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    user_id: Uuid,
    total_points: i64,
    available_points: i64,
    lifetime_points: i64,
    tier: String,
    tier_upgraded_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StatusRow> for UserLoyaltyStatus {
    type Error = DomainError;

    fn try_from(row: StatusRow) -> Result<Self, Self::Error> {
        Ok(UserLoyaltyStatus {
            user_id: UserId::from_uuid(row.user_id),
            total_points: to_u64("total_points", row.total_points)?,
            available_points: to_u64("available_points", row.available_points)?,
            lifetime_points: to_u64("lifetime_points", row.lifetime_points)?,
            tier: LoyaltyTier::parse(&row.tier).ok_or_else(|| corrupt("tier", &row.tier))?,
            tier_upgraded_at: opt_ts(row.tier_upgraded_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PointRow {
    id: Uuid,
    user_id: Uuid,
    points: i64,
    kind: String,
    description: String,
    booking_id: Option<Uuid>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PointRow> for LoyaltyPoint {
    type Error = DomainError;

    fn try_from(row: PointRow) -> Result<Self, Self::Error> {
        Ok(LoyaltyPoint {
            id: LoyaltyPointId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            points: to_u64("points", row.points)?,
            kind: LoyaltyPointKind::parse(&row.kind).ok_or_else(|| corrupt("kind", &row.kind))?,
            description: row.description,
            booking_id: row.booking_id.map(BookingId::from_uuid),
            expires_at: opt_ts(row.expires_at),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn as_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl LoyaltyRepository for PostgresLoyaltyRepository {
    async fn find_status(&self, user_id: &UserId) -> Result<Option<UserLoyaltyStatus>, DomainError> {
        let row: Option<StatusRow> = sqlx::query_as(
            r#"
            SELECT user_id, total_points, available_points, lifetime_points, tier,
                   tier_upgraded_at, updated_at
            FROM user_loyalty_status
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find loyalty status", e))?;

        row.map(UserLoyaltyStatus::try_from).transpose()
    }

    async fn save_status(&self, status: &UserLoyaltyStatus) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_loyalty_status (
                user_id, total_points, available_points, lifetime_points, tier,
                tier_upgraded_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                total_points = EXCLUDED.total_points,
                available_points = EXCLUDED.available_points,
                lifetime_points = EXCLUDED.lifetime_points,
                tier = EXCLUDED.tier,
                tier_upgraded_at = EXCLUDED.tier_upgraded_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(status.user_id.as_uuid())
        .bind(as_bigint(status.total_points))
        .bind(as_bigint(status.available_points))
        .bind(as_bigint(status.lifetime_points))
        .bind(status.tier.as_str())
        .bind(opt_dt(status.tier_upgraded_at))
        .bind(status.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save loyalty status", e))?;

        Ok(())
    }

    async fn append_entry(&self, entry: &LoyaltyPoint) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO loyalty_points (
                id, user_id, points, kind, description, booking_id, expires_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.user_id.as_uuid())
        .bind(as_bigint(entry.points))
        .bind(entry.kind.as_str())
        .bind(&entry.description)
        .bind(entry.booking_id.map(|b| *b.as_uuid()))
        .bind(opt_dt(entry.expires_at))
        .bind(entry.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("append loyalty entry", e))?;

        Ok(())
    }

    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<LoyaltyPoint>, DomainError> {
        let rows: Vec<PointRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, points, kind, description, booking_id, expires_at, created_at
            FROM loyalty_points
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list loyalty entries", e))?;

        rows.into_iter().map(LoyaltyPoint::try_from).collect()
    }
}
