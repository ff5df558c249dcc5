//! CancelBookingHandler - Cancels a pending or confirmed booking.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, UserId};
use crate::ports::BookingRepository;

use super::load_booking;

#[derive(Debug, Clone)]
pub struct CancelBookingCommand {
    pub booking_id: BookingId,
    pub cancelled_by: UserId,
    pub reason: String,
}

pub struct CancelBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl CancelBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: CancelBookingCommand) -> Result<Booking, DomainError> {
        let mut booking = load_booking(self.bookings.as_ref(), &cmd.booking_id).await?;
        booking.cancel(cmd.cancelled_by, cmd.reason)?;
        self.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id(), "Booking cancelled");
        Ok(booking)
    }
}
