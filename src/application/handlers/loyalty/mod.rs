//! Loyalty handlers.

mod award_points;
mod redeem_points;

pub use award_points::{AwardPointsCommand, AwardPointsHandler, AwardPointsResult};
pub use redeem_points::{RedeemPointsCommand, RedeemPointsHandler};
