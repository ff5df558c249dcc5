//! ConfirmBookingHandler - Confirms a pending booking.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, UserId};
use crate::ports::BookingRepository;

use super::load_booking;

#[derive(Debug, Clone)]
pub struct ConfirmBookingCommand {
    pub booking_id: BookingId,
    pub confirmed_by: UserId,
}

pub struct ConfirmBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl ConfirmBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: ConfirmBookingCommand) -> Result<Booking, DomainError> {
        let mut booking = load_booking(self.bookings.as_ref(), &cmd.booking_id).await?;
        booking.confirm(cmd.confirmed_by)?;
        self.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id(), confirmed_by = %cmd.confirmed_by, "Booking confirmed");
        Ok(booking)
    }
}
