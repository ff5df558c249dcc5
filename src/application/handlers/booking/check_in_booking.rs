//! CheckInBookingHandler - Checks a customer in on the booking date.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};
use crate::ports::BookingRepository;

use super::load_booking;

#[derive(Debug, Clone)]
pub struct CheckInBookingCommand {
    pub booking_id: BookingId,
}

pub struct CheckInBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl CheckInBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: CheckInBookingCommand) -> Result<Booking, DomainError> {
        let mut booking = load_booking(self.bookings.as_ref(), &cmd.booking_id).await?;
        booking.check_in()?;
        self.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id(), "Customer checked in");
        Ok(booking)
    }
}
