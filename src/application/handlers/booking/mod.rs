//! Booking handlers.
//!
//! ## Commands
//! - Creating a booking, optionally with a coupon and tax
//! - Lifecycle moves: confirm, cancel, complete, check in, no-show
//! - Refunding a cancelled booking and its payment

mod cancel_booking;
mod check_in_booking;
mod complete_booking;
mod confirm_booking;
mod create_booking;
mod mark_no_show;
mod refund_booking;

pub use cancel_booking::{CancelBookingCommand, CancelBookingHandler};
pub use check_in_booking::{CheckInBookingCommand, CheckInBookingHandler};
pub use complete_booking::{CompleteBookingCommand, CompleteBookingHandler};
pub use confirm_booking::{ConfirmBookingCommand, ConfirmBookingHandler};
pub use create_booking::{CreateBookingCommand, CreateBookingHandler, CreateBookingResult};
pub use mark_no_show::{MarkNoShowCommand, MarkNoShowHandler};
pub use refund_booking::{RefundBookingCommand, RefundBookingHandler, RefundBookingResult};

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, ErrorCode};
use crate::ports::BookingRepository;

async fn load_booking(bookings: &dyn BookingRepository, id: &BookingId) -> Result<Booking, DomainError> {
    bookings.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::BookingNotFound, format!("Booking not found: {}", id))
    })
}

#[cfg(test)]
pub(super) mod fixtures {
    use chrono::{Duration, NaiveTime, Utc};

    use crate::adapters::memory::InMemoryStore;
    use crate::domain::booking::{Booking, NewBooking};
    use crate::domain::foundation::{ActivityId, Currency, Money, UserId};
    use crate::ports::BookingRepository;

    /// Stores a pending booking for two people `days_ahead` days from today.
    pub async fn stored_booking(store: &InMemoryStore, days_ahead: i64) -> Booking {
        let booking = Booking::create(NewBooking {
            customer_id: UserId::new(),
            activity_id: ActivityId::new(),
            booking_date: (Utc::now() + Duration::days(days_ahead)).date_naive(),
            booking_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            participant_count: 2,
            price_per_participant: Money::from_major(1500),
            currency: Currency::inr(),
        })
        .unwrap();
        store.save(&booking).await.unwrap();
        booking
    }

    pub async fn stored_confirmed_booking(store: &InMemoryStore, days_ahead: i64) -> Booking {
        let mut booking = stored_booking(store, days_ahead).await;
        booking.confirm(UserId::new()).unwrap();
        store.update(&booking).await.unwrap();
        booking
    }

    pub async fn reload(store: &InMemoryStore, booking: &Booking) -> Booking {
        store.find_by_id(&booking.id()).await.unwrap().unwrap()
    }
}
