//! AwardPointsHandler - Credits loyalty points and re-derives the tier.

use std::sync::Arc;

use crate::domain::foundation::{BookingId, DomainError, UserId};
use crate::domain::loyalty::{LoyaltyPoint, LoyaltyTier, UserLoyaltyStatus};
use crate::ports::LoyaltyRepository;

#[derive(Debug, Clone)]
pub struct AwardPointsCommand {
    pub user_id: UserId,
    pub points: u64,
    pub description: String,
    pub booking_id: Option<BookingId>,
}

#[derive(Debug, Clone)]
pub struct AwardPointsResult {
    pub status: UserLoyaltyStatus,
    /// Set when this award moved the user into a new tier.
    pub upgraded_to: Option<LoyaltyTier>,
}

pub struct AwardPointsHandler {
    loyalty: Arc<dyn LoyaltyRepository>,
}

impl AwardPointsHandler {
    pub fn new(loyalty: Arc<dyn LoyaltyRepository>) -> Self {
        Self { loyalty }
    }

    pub async fn handle(&self, cmd: AwardPointsCommand) -> Result<AwardPointsResult, DomainError> {
        let entry = LoyaltyPoint::earned(cmd.user_id, cmd.points, cmd.description, cmd.booking_id)?;

        let mut status = self
            .loyalty
            .find_status(&cmd.user_id)
            .await?
            .unwrap_or_else(|| UserLoyaltyStatus::new(cmd.user_id));
        let upgraded_to = status.add_points(cmd.points)?;

        self.loyalty.append_entry(&entry).await?;
        self.loyalty.save_status(&status).await?;

        if let Some(tier) = upgraded_to {
            tracing::info!(user_id = %cmd.user_id, tier = %tier, "Loyalty tier upgraded");
        }
        Ok(AwardPointsResult { status, upgraded_to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::loyalty::LoyaltyPointKind;

    fn command(user_id: UserId, points: u64) -> AwardPointsCommand {
        AwardPointsCommand {
            user_id,
            points,
            description: "Booking completed".into(),
            booking_id: Some(BookingId::new()),
        }
    }

    #[tokio::test]
    async fn first_award_creates_status_and_entry() {
        let store = InMemoryStore::new();
        let handler = AwardPointsHandler::new(Arc::new(store.clone()));
        let user = UserId::new();

        let result = handler.handle(command(user, 300)).await.unwrap();

        assert_eq!(result.status.available_points(), 300);
        assert_eq!(result.status.tier(), LoyaltyTier::Bronze);
        assert!(result.upgraded_to.is_none());
        let entries = store.entries_for(&user).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind(), LoyaltyPointKind::Earned);
        assert!(entries[0].expires_at().is_some());
    }

    #[tokio::test]
    async fn crossing_threshold_reports_upgrade() {
        let store = InMemoryStore::new();
        let handler = AwardPointsHandler::new(Arc::new(store.clone()));
        let user = UserId::new();
        handler.handle(command(user, 4_900)).await.unwrap();

        let result = handler.handle(command(user, 200)).await.unwrap();

        assert_eq!(result.upgraded_to, Some(LoyaltyTier::Silver));
        let stored = store.find_status(&user).await.unwrap().unwrap();
        assert_eq!(stored.total_points(), 5_100);
        assert_eq!(stored.tier(), LoyaltyTier::Silver);
    }

    #[tokio::test]
    async fn zero_points_writes_nothing() {
        let store = InMemoryStore::new();
        let handler = AwardPointsHandler::new(Arc::new(store.clone()));
        let user = UserId::new();

        assert!(handler.handle(command(user, 0)).await.is_err());
        assert!(store.find_status(&user).await.unwrap().is_none());
        assert!(store.entries_for(&user).await.unwrap().is_empty());
    }
}
