//! Loyalty repository port.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::loyalty::{LoyaltyPoint, UserLoyaltyStatus};
use async_trait::async_trait;

#[async_trait]
pub trait LoyaltyRepository: Send + Sync {
    async fn find_status(&self, user_id: &UserId) -> Result<Option<UserLoyaltyStatus>, DomainError>;

    /// Inserts or replaces the status row for the user.
    async fn save_status(&self, status: &UserLoyaltyStatus) -> Result<(), DomainError>;

    async fn append_entry(&self, entry: &LoyaltyPoint) -> Result<(), DomainError>;

    /// Ledger entries for a user, newest first.
    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<LoyaltyPoint>, DomainError>;
}
