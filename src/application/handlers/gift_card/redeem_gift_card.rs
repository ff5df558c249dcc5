//! RedeemGiftCardHandler - Draws a gift card balance against a booking.

use std::sync::Arc;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, Money, UserId};
use crate::domain::gift_card::{GiftCard, GiftCardCode, GiftCardTransaction};
use crate::ports::GiftCardRepository;

#[derive(Debug, Clone)]
pub struct RedeemGiftCardCommand {
    pub code: String,
    pub amount: Money,
    pub booking_id: BookingId,
    pub used_by: UserId,
}

#[derive(Debug, Clone)]
pub struct RedeemGiftCardResult {
    pub gift_card: GiftCard,
    pub transaction: GiftCardTransaction,
}

pub struct RedeemGiftCardHandler {
    gift_cards: Arc<dyn GiftCardRepository>,
}

impl RedeemGiftCardHandler {
    pub fn new(gift_cards: Arc<dyn GiftCardRepository>) -> Self {
        Self { gift_cards }
    }

    /// # Errors
    ///
    /// `GiftCardNotFound`, `GiftCardExpired`, `GiftCardDepleted`, or an
    /// invalid state for a cancelled card.
    pub async fn handle(&self, cmd: RedeemGiftCardCommand) -> Result<RedeemGiftCardResult, DomainError> {
        let code = GiftCardCode::parse(&cmd.code)?;
        let mut card = self.gift_cards.find_by_code(&code).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::GiftCardNotFound, format!("Gift card not found: {}", code))
        })?;

        let transaction = match card.use_balance(cmd.amount, cmd.booking_id, cmd.used_by) {
            Ok(transaction) => transaction,
            Err(err) => {
                // Expiry is detected on use; keep the flipped status.
                if err.code == ErrorCode::GiftCardExpired {
                    self.gift_cards.update(&card).await?;
                    tracing::info!(gift_card_id = %card.id(), "Gift card marked expired");
                }
                return Err(err);
            }
        };

        self.gift_cards.update(&card).await?;
        self.gift_cards.record_transaction(&transaction).await?;

        tracing::info!(
            gift_card_id = %card.id(),
            booking_id = %cmd.booking_id,
            amount_used = %transaction.amount_used(),
            balance = %card.balance(),
            "Gift card redeemed"
        );
        Ok(RedeemGiftCardResult {
            gift_card: card,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{Currency, Timestamp};
    use crate::domain::gift_card::{GiftCardDetails, GiftCardStatus};

    async fn stored_card(store: &InMemoryStore, amount: Money, issued: Timestamp, validity_days: u32) -> GiftCard {
        let card = GiftCard::issue_at(amount, Currency::inr(), GiftCardDetails::default(), validity_days, issued)
            .unwrap();
        GiftCardRepository::save(store, &card).await.unwrap();
        card
    }

    fn command(card: &GiftCard, amount: Money) -> RedeemGiftCardCommand {
        RedeemGiftCardCommand {
            code: card.code().as_str().to_string(),
            amount,
            booking_id: BookingId::new(),
            used_by: UserId::new(),
        }
    }

    #[tokio::test]
    async fn partial_use_leaves_card_active_and_records_transaction() {
        let store = InMemoryStore::new();
        let card = stored_card(&store, Money::from_major(2000), Timestamp::now(), 30).await;
        let handler = RedeemGiftCardHandler::new(Arc::new(store.clone()));

        let result = handler.handle(command(&card, Money::from_major(500))).await.unwrap();

        assert_eq!(result.gift_card.balance(), Money::from_major(1500));
        assert_eq!(result.gift_card.status(), GiftCardStatus::Active);
        assert_eq!(result.transaction.balance_after(), Money::from_major(1500));
        let ledger = store.transactions_for(&card.id()).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].amount_used(), Money::from_major(500));
    }

    #[tokio::test]
    async fn overdraw_consumes_balance_and_redeems_card() {
        let store = InMemoryStore::new();
        let card = stored_card(&store, Money::from_major(800), Timestamp::now(), 30).await;
        let handler = RedeemGiftCardHandler::new(Arc::new(store.clone()));

        let result = handler.handle(command(&card, Money::from_major(1000))).await.unwrap();

        assert_eq!(result.transaction.amount_used(), Money::from_major(800));
        let stored = GiftCardRepository::find_by_id(&store, &card.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), GiftCardStatus::Redeemed);
        assert!(stored.balance().is_zero());

        let err = handler.handle(command(&card, Money::from_major(1))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GiftCardDepleted);
    }

    #[tokio::test]
    async fn expired_card_is_persisted_as_expired() {
        let store = InMemoryStore::new();
        let card = stored_card(&store, Money::from_major(800), Timestamp::now().add_days(-40), 30).await;
        let handler = RedeemGiftCardHandler::new(Arc::new(store.clone()));

        let err = handler.handle(command(&card, Money::from_major(100))).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::GiftCardExpired);
        let stored = GiftCardRepository::find_by_id(&store, &card.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), GiftCardStatus::Expired);
        assert!(store.transactions_for(&card.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let store = InMemoryStore::new();
        let handler = RedeemGiftCardHandler::new(Arc::new(store));
        let code = GiftCardCode::generate();

        let err = handler
            .handle(RedeemGiftCardCommand {
                code: code.as_str().to_string(),
                amount: Money::from_major(100),
                booking_id: BookingId::new(),
                used_by: UserId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::GiftCardNotFound);
    }
}
