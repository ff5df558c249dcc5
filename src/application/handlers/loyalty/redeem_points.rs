//! RedeemPointsHandler - Spends available loyalty points.

use std::sync::Arc;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, UserId};
use crate::domain::loyalty::{LoyaltyPoint, UserLoyaltyStatus};
use crate::ports::LoyaltyRepository;

#[derive(Debug, Clone)]
pub struct RedeemPointsCommand {
    pub user_id: UserId,
    pub points: u64,
    pub description: String,
    pub booking_id: Option<BookingId>,
}

pub struct RedeemPointsHandler {
    loyalty: Arc<dyn LoyaltyRepository>,
}

impl RedeemPointsHandler {
    pub fn new(loyalty: Arc<dyn LoyaltyRepository>) -> Self {
        Self { loyalty }
    }

    /// # Errors
    ///
    /// `LoyaltyStatusNotFound` for a user who never earned points,
    /// `InsufficientPoints` when the balance is short.
    pub async fn handle(&self, cmd: RedeemPointsCommand) -> Result<UserLoyaltyStatus, DomainError> {
        let mut status = self.loyalty.find_status(&cmd.user_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::LoyaltyStatusNotFound,
                format!("No loyalty status for user {}", cmd.user_id),
            )
        })?;
        let entry = LoyaltyPoint::redeemed(cmd.user_id, cmd.points, cmd.description, cmd.booking_id)?;
        status.redeem_points(cmd.points)?;

        self.loyalty.append_entry(&entry).await?;
        self.loyalty.save_status(&status).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            points = cmd.points,
            available = status.available_points(),
            "Loyalty points redeemed"
        );
        Ok(status)
    }
}
