//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresBookingRepository`, `PostgresPaymentRepository` - core aggregates
//! - `PostgresCouponRepository`, `PostgresGiftCardRepository`, `PostgresLoyaltyRepository`
//! - `PostgresUnitOfWorkFactory` - transactional scope for webhook reconciliation

mod booking_repository;
mod coupon_repository;
mod gift_card_repository;
mod loyalty_repository;
mod payment_repository;
mod unit_of_work;

pub use booking_repository::PostgresBookingRepository;
pub use coupon_repository::PostgresCouponRepository;
pub use gift_card_repository::PostgresGiftCardRepository;
pub use loyalty_repository::PostgresLoyaltyRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};

use chrono::{DateTime, Utc};

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp, ValidationError};

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

fn corrupt(field: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid stored {} value: {}", field, value),
    )
}

fn opt_ts(value: Option<DateTime<Utc>>) -> Option<Timestamp> {
    value.map(Timestamp::from_datetime)
}

fn opt_dt(value: Option<Timestamp>) -> Option<DateTime<Utc>> {
    value.map(|t| *t.as_datetime())
}

fn to_u32(field: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt(field, value))
}

/// Narrows a count to an `INTEGER` column, rejecting values above `i32::MAX`.
fn to_int(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        ValidationError::out_of_range(field, 0, i64::from(i32::MAX), i64::from(value)).into()
    })
}

fn to_u64(field: &str, value: i64) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| corrupt(field, value))
}

fn opt_money(value: Option<i64>) -> Option<Money> {
    value.map(Money::from_minor)
}
