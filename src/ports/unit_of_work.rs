//! Transactional unit of work port.
//!
//! The captured-payment webhook must complete the payment and confirm the
//! booking atomically. A `UnitOfWork` scopes the reads and writes of that
//! flow to one transaction.
//!
//! # Contract
//!
//! - Writes become visible to other readers only after `commit`
//! - `rollback`, or dropping the unit without committing, discards them
//! - Reads inside the unit see its own uncommitted writes

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, UserId};
use crate::domain::payment::Payment;
use async_trait::async_trait;

#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_payment_by_gateway_order_id(&mut self, order_id: &str) -> Result<Option<Payment>, DomainError>;

    async fn find_payment_by_gateway_transaction_id(
        &mut self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError>;

    async fn find_booking(&mut self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    async fn find_user_id_by_email(&mut self, email: &str) -> Result<Option<UserId>, DomainError>;

    async fn update_payment(&mut self, payment: &Payment) -> Result<(), DomainError>;

    async fn update_booking(&mut self, booking: &Booking) -> Result<(), DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

/// Opens units of work.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError>;
}
