use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, LoyaltyPointId, Timestamp, UserId, ValidationError};

/// Earned points expire after this many days. Redemptions never expire.
pub const EARNED_POINTS_VALIDITY_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyPointKind {
    Earned,
    Redeemed,
}

impl LoyaltyPointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyPointKind::Earned => "earned",
            LoyaltyPointKind::Redeemed => "redeemed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "earned" => Some(LoyaltyPointKind::Earned),
            "redeemed" => Some(LoyaltyPointKind::Redeemed),
            _ => None,
        }
    }
}

/// Immutable loyalty ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyPoint {
    pub(crate) id: LoyaltyPointId,
    pub(crate) user_id: UserId,
    pub(crate) points: u64,
    pub(crate) kind: LoyaltyPointKind,
    pub(crate) description: String,
    pub(crate) booking_id: Option<BookingId>,
    pub(crate) expires_at: Option<Timestamp>,
    pub(crate) created_at: Timestamp,
}

impl LoyaltyPoint {
    pub fn earned(
        user_id: UserId,
        points: u64,
        description: impl Into<String>,
        booking_id: Option<BookingId>,
    ) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        Self::build(
            user_id,
            points,
            LoyaltyPointKind::Earned,
            description,
            booking_id,
            Some(now.add_days(EARNED_POINTS_VALIDITY_DAYS)),
            now,
        )
    }

    pub fn redeemed(
        user_id: UserId,
        points: u64,
        description: impl Into<String>,
        booking_id: Option<BookingId>,
    ) -> Result<Self, ValidationError> {
        Self::build(
            user_id,
            points,
            LoyaltyPointKind::Redeemed,
            description,
            booking_id,
            None,
            Timestamp::now(),
        )
    }

    fn build(
        user_id: UserId,
        points: u64,
        kind: LoyaltyPointKind,
        description: impl Into<String>,
        booking_id: Option<BookingId>,
        expires_at: Option<Timestamp>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if points == 0 {
            return Err(ValidationError::out_of_range("points", 1, i64::MAX, 0));
        }
        Ok(Self {
            id: LoyaltyPointId::new(),
            user_id,
            points,
            kind,
            description: description.into(),
            booking_id,
            expires_at,
            created_at,
        })
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.map(|e| now.is_after(&e)).unwrap_or(false)
    }

    pub fn id(&self) -> LoyaltyPointId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn kind(&self) -> LoyaltyPointKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn booking_id(&self) -> Option<BookingId> {
        self.booking_id
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earned_entries_expire_after_a_year() {
        let entry = LoyaltyPoint::earned(UserId::new(), 250, "Booking reward", None).unwrap();
        let expires = entry.expires_at().unwrap();

        assert_eq!(expires, entry.created_at().add_days(365));
        assert!(!entry.is_expired_at(entry.created_at()));
        assert!(entry.is_expired_at(expires.add_days(1)));
    }

    #[test]
    fn redeemed_entries_never_expire() {
        let entry = LoyaltyPoint::redeemed(UserId::new(), 100, "Discount", None).unwrap();
        assert!(entry.expires_at().is_none());
        assert_eq!(entry.kind(), LoyaltyPointKind::Redeemed);
    }

    #[test]
    fn zero_points_rejected() {
        assert!(LoyaltyPoint::earned(UserId::new(), 0, "nothing", None).is_err());
    }
}
