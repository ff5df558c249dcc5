//! IssueGiftCardHandler - Issues a new stored-value card.

use std::sync::Arc;

use crate::domain::foundation::{Currency, DomainError, Money};
use crate::domain::gift_card::{GiftCard, GiftCardDetails, DEFAULT_VALIDITY_DAYS};
use crate::ports::GiftCardRepository;

#[derive(Debug, Clone)]
pub struct IssueGiftCardCommand {
    pub amount: Money,
    pub currency: Currency,
    pub details: GiftCardDetails,
    /// Defaults to [`DEFAULT_VALIDITY_DAYS`].
    pub validity_days: Option<u32>,
}

pub struct IssueGiftCardHandler {
    gift_cards: Arc<dyn GiftCardRepository>,
}

impl IssueGiftCardHandler {
    pub fn new(gift_cards: Arc<dyn GiftCardRepository>) -> Self {
        Self { gift_cards }
    }

    pub async fn handle(&self, cmd: IssueGiftCardCommand) -> Result<GiftCard, DomainError> {
        let card = GiftCard::issue(
            cmd.amount,
            cmd.currency,
            cmd.details,
            cmd.validity_days.unwrap_or(DEFAULT_VALIDITY_DAYS),
        )?;
        self.gift_cards.save(&card).await?;

        tracing::info!(
            gift_card_id = %card.id(),
            amount = %card.amount(),
            expires_at = %card.expires_at(),
            "Gift card issued"
        );
        Ok(card)
    }
}
