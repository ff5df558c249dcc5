//! MarkNoShowHandler - Cancels a confirmed booking whose customer did not turn up.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};
use crate::ports::BookingRepository;

use super::load_booking;

#[derive(Debug, Clone)]
pub struct MarkNoShowCommand {
    pub booking_id: BookingId,
}

pub struct MarkNoShowHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl MarkNoShowHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: MarkNoShowCommand) -> Result<Booking, DomainError> {
        let mut booking = load_booking(self.bookings.as_ref(), &cmd.booking_id).await?;
        booking.mark_as_no_show()?;
        self.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id(), "Booking marked as no-show");
        Ok(booking)
    }
}
