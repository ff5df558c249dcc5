//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod booking;
pub mod coupon;
pub mod gift_card;
pub mod loyalty;
pub mod payment;
