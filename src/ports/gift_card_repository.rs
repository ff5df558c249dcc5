//! Gift card repository port.

use crate::domain::foundation::{DomainError, GiftCardId};
use crate::domain::gift_card::{GiftCard, GiftCardCode, GiftCardTransaction};
use async_trait::async_trait;

#[async_trait]
pub trait GiftCardRepository: Send + Sync {
    async fn save(&self, card: &GiftCard) -> Result<(), DomainError>;

    async fn update(&self, card: &GiftCard) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &GiftCardId) -> Result<Option<GiftCard>, DomainError>;

    async fn find_by_code(&self, code: &GiftCardCode) -> Result<Option<GiftCard>, DomainError>;

    /// Appends a ledger row. Rows are never updated or deleted.
    async fn record_transaction(&self, transaction: &GiftCardTransaction) -> Result<(), DomainError>;

    /// Ledger rows for a card, oldest first.
    async fn transactions_for(&self, id: &GiftCardId) -> Result<Vec<GiftCardTransaction>, DomainError>;
}
