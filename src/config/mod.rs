//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `FUNBOOKR` prefix and
//! nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use funbookr::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment gateway configuration
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `FUNBOOKR__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FUNBOOKR__DATABASE__URL=...` -> `database.url = ...`
    /// - `FUNBOOKR__PAYMENT__WEBHOOK_SECRET=...` -> `payment.webhook_secret = ...`
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FUNBOOKR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::payment::SystemActor;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "FUNBOOKR__DATABASE__URL",
        "FUNBOOKR__PAYMENT__WEBHOOK_SECRET",
        "FUNBOOKR__PAYMENT__SYSTEM_ACTOR_ID",
        "FUNBOOKR__SERVER__PORT",
        "FUNBOOKR__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var("FUNBOOKR__DATABASE__URL", "postgres://funbookr@localhost/funbookr");
        env::set_var("FUNBOOKR__PAYMENT__WEBHOOK_SECRET", "whsec_0123456789abcdef");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgres://funbookr@localhost/funbookr");
        assert_eq!(config.payment.gateway_name, "razorpay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("FUNBOOKR__SERVER__PORT", "3000");
        env::set_var("FUNBOOKR__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
    }

    #[test]
    fn test_system_actor_id_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let id = uuid::Uuid::new_v4();
        env::set_var("FUNBOOKR__PAYMENT__SYSTEM_ACTOR_ID", id.to_string());
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(config.payment.system_actor(), SystemActor::Id(actor) if *actor.as_uuid() == id));
    }

    #[test]
    fn test_missing_webhook_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("FUNBOOKR__DATABASE__URL", "postgres://funbookr@localhost/funbookr");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
