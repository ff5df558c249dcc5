//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (money, IDs, errors, state machine)
//! - `booking` - Booking aggregate and lifecycle
//! - `payment` - Payment aggregate and gateway webhook types
//! - `coupon` - Discount codes and their usage records
//! - `gift_card` - Stored-value cards and their ledger
//! - `loyalty` - Point ledger and tier status

pub mod booking;
pub mod coupon;
pub mod foundation;
pub mod gift_card;
pub mod loyalty;
pub mod payment;
