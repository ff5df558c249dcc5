use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, GiftCardId, GiftCardTransactionId, Money, Timestamp, UserId};

/// Ledger row for one gift card use. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardTransaction {
    id: GiftCardTransactionId,
    gift_card_id: GiftCardId,
    booking_id: BookingId,
    amount_used: Money,
    balance_after: Money,
    used_by: UserId,
    created_at: Timestamp,
}

impl GiftCardTransaction {
    pub(crate) fn record(
        gift_card_id: GiftCardId,
        booking_id: BookingId,
        amount_used: Money,
        balance_after: Money,
        used_by: UserId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: GiftCardTransactionId::new(),
            gift_card_id,
            booking_id,
            amount_used,
            balance_after,
            used_by,
            created_at,
        }
    }

    /// Rebuilds a stored ledger row.
    pub fn reconstitute(
        id: GiftCardTransactionId,
        gift_card_id: GiftCardId,
        booking_id: BookingId,
        amount_used: Money,
        balance_after: Money,
        used_by: UserId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            gift_card_id,
            booking_id,
            amount_used,
            balance_after,
            used_by,
            created_at,
        }
    }

    pub fn id(&self) -> GiftCardTransactionId {
        self.id
    }

    pub fn gift_card_id(&self) -> GiftCardId {
        self.gift_card_id
    }

    pub fn booking_id(&self) -> BookingId {
        self.booking_id
    }

    pub fn amount_used(&self) -> Money {
        self.amount_used
    }

    pub fn balance_after(&self) -> Money {
        self.balance_after
    }

    pub fn used_by(&self) -> UserId {
        self.used_by
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
