//! Per-user loyalty balance and tier.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Percentage, Timestamp, UserId, ValidationError};

use super::LoyaltyTier;

/// Counters are stored as signed 64-bit columns.
const MAX_POINTS: u64 = i64::MAX as u64;

/// Aggregate loyalty state for one user.
///
/// `total_points` and `lifetime_points` only grow. Redemptions reduce
/// `available_points` alone, so the tier never drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoyaltyStatus {
    pub(crate) user_id: UserId,
    pub(crate) total_points: u64,
    pub(crate) available_points: u64,
    pub(crate) lifetime_points: u64,
    pub(crate) tier: LoyaltyTier,
    pub(crate) tier_upgraded_at: Option<Timestamp>,
    pub(crate) updated_at: Timestamp,
}

impl UserLoyaltyStatus {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            total_points: 0,
            available_points: 0,
            lifetime_points: 0,
            tier: LoyaltyTier::Bronze,
            tier_upgraded_at: None,
            updated_at: Timestamp::now(),
        }
    }

    /// Adds points and re-derives the tier.
    ///
    /// Returns the new tier when it changed.
    ///
    /// Rejects an award that would push any counter past `i64::MAX`; the
    /// status is unchanged in that case.
    pub fn add_points(&mut self, points: u64) -> Result<Option<LoyaltyTier>, DomainError> {
        if points == 0 {
            return Err(ValidationError::out_of_range("points", 1, i64::MAX, 0).into());
        }
        let grow = |counter: u64| counter.checked_add(points).filter(|sum| *sum <= MAX_POINTS);
        let (Some(total), Some(available), Some(lifetime)) = (
            grow(self.total_points),
            grow(self.available_points),
            grow(self.lifetime_points),
        ) else {
            let headroom = MAX_POINTS.saturating_sub(self.lifetime_points.max(self.total_points));
            return Err(ValidationError::out_of_range(
                "points",
                1,
                i64::try_from(headroom).unwrap_or(i64::MAX),
                i64::try_from(points).unwrap_or(i64::MAX),
            )
            .into());
        };
        let now = Timestamp::now();
        self.total_points = total;
        self.available_points = available;
        self.lifetime_points = lifetime;
        self.updated_at = now;

        let tier = LoyaltyTier::for_points(self.total_points);
        if tier != self.tier {
            self.tier = tier;
            self.tier_upgraded_at = Some(now);
            return Ok(Some(tier));
        }
        Ok(None)
    }

    pub fn redeem_points(&mut self, points: u64) -> Result<(), DomainError> {
        if points == 0 {
            return Err(ValidationError::out_of_range("points", 1, i64::MAX, 0).into());
        }
        if points > self.available_points {
            return Err(DomainError::new(
                ErrorCode::InsufficientPoints,
                format!(
                    "Cannot redeem {} points, only {} available",
                    points, self.available_points
                ),
            ));
        }
        self.available_points -= points;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn tier_discount(&self) -> Percentage {
        self.tier.discount()
    }

    /// Points still needed for the next tier, if any.
    pub fn points_to_next_tier(&self) -> Option<u64> {
        self.tier
            .next()
            .map(|next| next.min_points().saturating_sub(self.total_points))
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn available_points(&self) -> u64 {
        self.available_points
    }

    pub fn lifetime_points(&self) -> u64 {
        self.lifetime_points
    }

    pub fn tier(&self) -> LoyaltyTier {
        self.tier
    }

    pub fn tier_upgraded_at(&self) -> Option<Timestamp> {
        self.tier_upgraded_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
