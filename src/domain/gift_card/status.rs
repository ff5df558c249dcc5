//! Gift card status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftCardStatus {
    Active,
    /// Balance fully spent.
    Redeemed,
    /// Past its expiry date. Set lazily on the first use attempt after expiry.
    Expired,
    Cancelled,
}

impl GiftCardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCardStatus::Active => "active",
            GiftCardStatus::Redeemed => "redeemed",
            GiftCardStatus::Expired => "expired",
            GiftCardStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(GiftCardStatus::Active),
            "redeemed" => Some(GiftCardStatus::Redeemed),
            "expired" => Some(GiftCardStatus::Expired),
            "cancelled" => Some(GiftCardStatus::Cancelled),
            _ => None,
        }
    }
}

impl StateMachine for GiftCardStatus {
    const SUBJECT: &'static str = "gift card";

    fn can_transition_to(&self, target: &Self) -> bool {
        use GiftCardStatus::*;
        matches!(
            (self, target),
            (Active, Redeemed) | (Active, Expired) | (Active, Cancelled) | (Expired, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use GiftCardStatus::*;
        match self {
            Active => vec![Redeemed, Expired, Cancelled],
            Expired => vec![Cancelled],
            Redeemed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for GiftCardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
