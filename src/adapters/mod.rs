//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for webhooks and health
//! - `postgres` - sqlx repositories and the transactional unit of work
//! - `memory` - In-process store used by tests and local runs
//! - `notifications` - Payment notifier that writes to the log

pub mod http;
pub mod memory;
pub mod notifications;
pub mod postgres;
