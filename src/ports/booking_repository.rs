//! Booking repository port.

use crate::domain::booking::{Booking, BookingReference};
use crate::domain::foundation::{BookingId, DomainError};
use async_trait::async_trait;

/// Repository port for Booking aggregate persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure or duplicate reference
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Update an existing booking.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    async fn find_by_reference(
        &self,
        reference: &BookingReference,
    ) -> Result<Option<Booking>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BookingRepository) {}
    }
}
