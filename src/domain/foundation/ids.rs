//! Strongly-typed identifier value objects.
//!
//! Every aggregate and every cross-aggregate reference gets its own UUID
//! newtype so a `BookingId` can never be passed where a `PaymentId` is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// True for the all-zero UUID, treated as "not provided".
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a booking.
    BookingId
);
uuid_id!(
    /// Unique identifier for a payment.
    PaymentId
);
uuid_id!(
    /// Unique identifier for a coupon.
    CouponId
);
uuid_id!(CouponUsageId);
uuid_id!(
    /// Unique identifier for a gift card.
    GiftCardId
);
uuid_id!(GiftCardTransactionId);
uuid_id!(LoyaltyPointId);
uuid_id!(
    /// Bookable activity listed by a provider.
    ActivityId
);
uuid_id!(
    /// Activity category, used for coupon restrictions.
    CategoryId
);
uuid_id!(
    /// A user account: customer, admin, or the system actor.
    UserId
);
