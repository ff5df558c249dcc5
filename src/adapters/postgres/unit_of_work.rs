//! Transactional unit of work backed by a PostgreSQL transaction.
//!
//! Payment lookups take a row lock (`FOR UPDATE`) so concurrent deliveries of
//! the same webhook serialize on the payment row.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, UserId};
use crate::domain::payment::Payment;
use crate::ports::{UnitOfWork, UnitOfWorkFactory};

use super::booking_repository::{update_booking, BookingRow, BOOKING_COLUMNS};
use super::payment_repository::{update_payment, PaymentRow, PAYMENT_COLUMNS};
use super::db_error;

pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }
}

pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PostgresUnitOfWork {
    async fn lock_payment(&mut self, column: &str, value: &str) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payments WHERE {} = $1 FOR UPDATE",
            PAYMENT_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("lock payment", e))?;

        row.map(Payment::try_from).transpose()
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn find_payment_by_gateway_order_id(&mut self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        self.lock_payment("gateway_order_id", order_id).await
    }

    async fn find_payment_by_gateway_transaction_id(
        &mut self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        self.lock_payment("gateway_transaction_id", transaction_id).await
    }

    async fn find_booking(&mut self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE id = $1 FOR UPDATE",
            BOOKING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("lock booking", e))?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_user_id_by_email(&mut self, email: &str) -> Result<Option<UserId>, DomainError> {
        let id: Option<uuid::Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error("find user", e))?;

        Ok(id.map(UserId::from_uuid))
    }

    async fn update_payment(&mut self, payment: &Payment) -> Result<(), DomainError> {
        update_payment(&mut *self.tx, payment).await
    }

    async fn update_booking(&mut self, booking: &Booking) -> Result<(), DomainError> {
        update_booking(&mut *self.tx, booking).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| db_error("rollback transaction", e))
    }
}
