//! Booking domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Booking aggregate and its lifecycle operations
//! - `status` - BookingStatus state machine
//! - `reference` - `BK-YYYYMMDD-XXXXXX` references
//! - `participant` - Named attendees

mod aggregate;
mod participant;
mod reference;
mod status;

pub use aggregate::{Booking, NewBooking, NO_SHOW_REASON};
pub use participant::Participant;
pub use reference::BookingReference;
pub use status::BookingStatus;
