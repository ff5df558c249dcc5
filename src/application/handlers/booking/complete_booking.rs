//! CompleteBookingHandler - Completes a confirmed booking on or after its date.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};
use crate::ports::BookingRepository;

use super::load_booking;

#[derive(Debug, Clone)]
pub struct CompleteBookingCommand {
    pub booking_id: BookingId,
}

pub struct CompleteBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl CompleteBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: CompleteBookingCommand) -> Result<Booking, DomainError> {
        let mut booking = load_booking(self.bookings.as_ref(), &cmd.booking_id).await?;
        booking.complete()?;
        self.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id(), "Booking completed");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::booking::fixtures::{reload, stored_confirmed_booking};
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn completes_booking_on_its_date() {
        let store = InMemoryStore::new();
        let booking = stored_confirmed_booking(&store, 0).await;
        let handler = CompleteBookingHandler::new(Arc::new(store.clone()));

        handler
            .handle(CompleteBookingCommand {
                booking_id: booking.id(),
            })
            .await
            .unwrap();

        let stored = reload(&store, &booking).await;
        assert_eq!(stored.status(), BookingStatus::Completed);
        assert!(stored.completed_at().is_some());
    }

    #[tokio::test]
    async fn future_booking_cannot_complete() {
        let store = InMemoryStore::new();
        let booking = stored_confirmed_booking(&store, 3).await;
        let handler = CompleteBookingHandler::new(Arc::new(store.clone()));

        let err = handler
            .handle(CompleteBookingCommand {
                booking_id: booking.id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(reload(&store, &booking).await.status(), BookingStatus::Confirmed);
    }
}
