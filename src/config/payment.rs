//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::handlers::payment::{SystemActor, DEFAULT_SYSTEM_ACTOR_EMAIL};
use crate::domain::foundation::{Currency, UserId};
use crate::domain::payment::GatewaySignatureVerifier;

use super::error::ValidationError;

const MIN_WEBHOOK_SECRET_LEN: usize = 16;

/// Payment gateway configuration (Razorpay)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Name recorded on payments
    #[serde(default = "default_gateway_name")]
    pub gateway_name: String,

    /// Shared secret for webhook HMAC signatures
    pub webhook_secret: SecretString,

    /// User recorded as confirming bookings on capture; wins over the email
    pub system_actor_id: Option<Uuid>,

    /// Looked up in `users` when no id is configured
    #[serde(default = "default_system_actor_email")]
    pub system_actor_email: String,

    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl PaymentConfig {
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            gateway_name: default_gateway_name(),
            webhook_secret: SecretString::new(webhook_secret.into()),
            system_actor_id: None,
            system_actor_email: default_system_actor_email(),
            default_currency: default_currency(),
        }
    }

    pub fn signature_verifier(&self) -> GatewaySignatureVerifier {
        GatewaySignatureVerifier::new(self.webhook_secret.expose_secret().clone())
    }

    /// The configured id when set, otherwise the email to resolve.
    pub fn system_actor(&self) -> SystemActor {
        match self.system_actor_id {
            Some(id) => SystemActor::Id(UserId::from_uuid(id)),
            None => SystemActor::Email(self.system_actor_email.trim().to_string()),
        }
    }

    pub fn currency(&self) -> Result<Currency, ValidationError> {
        Currency::new(&self.default_currency)
            .map_err(|_| ValidationError::InvalidCurrency(self.default_currency.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gateway_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__GATEWAY_NAME"));
        }
        let secret = self.webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__WEBHOOK_SECRET"));
        }
        if secret.len() < MIN_WEBHOOK_SECRET_LEN {
            return Err(ValidationError::WebhookSecretTooShort(MIN_WEBHOOK_SECRET_LEN));
        }
        if self.system_actor_id.is_none() {
            let email = self.system_actor_email.trim();
            let well_formed = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !well_formed {
                return Err(ValidationError::InvalidSystemActorEmail(email.to_string()));
            }
        }
        self.currency()?;
        Ok(())
    }
}

fn default_gateway_name() -> String {
    "razorpay".to_string()
}

fn default_system_actor_email() -> String {
    DEFAULT_SYSTEM_ACTOR_EMAIL.to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}
