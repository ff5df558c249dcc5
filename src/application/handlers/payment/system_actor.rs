//! The account that confirms bookings on behalf of the payment gateway.

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UnitOfWork;

/// Default email of the system account.
pub const DEFAULT_SYSTEM_ACTOR_EMAIL: &str = "system@funbookr.com";

/// Configured identity used for automatic booking confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemActor {
    /// Known user id, used as is.
    Id(UserId),
    /// Looked up by email inside the current unit of work.
    Email(String),
}

impl SystemActor {
    /// Resolves the actor to a user id. `None` when the email has no account.
    pub async fn resolve(&self, uow: &mut dyn UnitOfWork) -> Result<Option<UserId>, DomainError> {
        match self {
            SystemActor::Id(id) => Ok(Some(*id)),
            SystemActor::Email(email) => uow.find_user_id_by_email(email).await,
        }
    }
}

impl Default for SystemActor {
    fn default() -> Self {
        SystemActor::Email(DEFAULT_SYSTEM_ACTOR_EMAIL.to_string())
    }
}
