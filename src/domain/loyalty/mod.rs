//! Loyalty domain module.
//!
//! - `tier` - Bronze/Silver/Gold/Platinum thresholds and discounts
//! - `point` - Immutable earned/redeemed ledger entries
//! - `status` - Per-user balances and current tier

mod point;
mod status;
mod tier;

pub use point::{LoyaltyPoint, LoyaltyPointKind, EARNED_POINTS_VALIDITY_DAYS};
pub use status::UserLoyaltyStatus;
pub use tier::LoyaltyTier;
