//! Loyalty tiers.
//!
//! Tiers are derived from total points against fixed thresholds and each
//! carries a fixed booking discount.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// Tier earned by `total_points`.
    pub fn for_points(total_points: u64) -> Self {
        match total_points {
            p if p >= LoyaltyTier::Platinum.min_points() => LoyaltyTier::Platinum,
            p if p >= LoyaltyTier::Gold.min_points() => LoyaltyTier::Gold,
            p if p >= LoyaltyTier::Silver.min_points() => LoyaltyTier::Silver,
            _ => LoyaltyTier::Bronze,
        }
    }

    /// Points needed to reach this tier.
    pub fn min_points(&self) -> u64 {
        match self {
            LoyaltyTier::Bronze => 0,
            LoyaltyTier::Silver => 5_000,
            LoyaltyTier::Gold => 20_000,
            LoyaltyTier::Platinum => 50_000,
        }
    }

    pub fn discount(&self) -> Percentage {
        match self {
            LoyaltyTier::Bronze => Percentage::new(0),
            LoyaltyTier::Silver => Percentage::new(5),
            LoyaltyTier::Gold => Percentage::new(10),
            LoyaltyTier::Platinum => Percentage::new(15),
        }
    }

    pub fn next(&self) -> Option<LoyaltyTier> {
        match self {
            LoyaltyTier::Bronze => Some(LoyaltyTier::Silver),
            LoyaltyTier::Silver => Some(LoyaltyTier::Gold),
            LoyaltyTier::Gold => Some(LoyaltyTier::Platinum),
            LoyaltyTier::Platinum => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "bronze",
            LoyaltyTier::Silver => "silver",
            LoyaltyTier::Gold => "gold",
            LoyaltyTier::Platinum => "platinum",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bronze" => Some(LoyaltyTier::Bronze),
            "silver" => Some(LoyaltyTier::Silver),
            "gold" => Some(LoyaltyTier::Gold),
            "platinum" => Some(LoyaltyTier::Platinum),
            _ => None,
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
