//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the FunBookr domain.

mod codes;
mod errors;
mod ids;
mod money;
mod percentage;
mod state_machine;
mod timestamp;

pub use codes::{is_code_segment, random_code};
pub use errors::{DomainError, ErrorCategory, ErrorCode, ValidationError};
pub use ids::{
    ActivityId, BookingId, CategoryId, CouponId, CouponUsageId, GiftCardId,
    GiftCardTransactionId, LoyaltyPointId, PaymentId, UserId,
};
pub use money::{Currency, Money};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
