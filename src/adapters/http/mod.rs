//! HTTP adapters - REST API implementations.
//!
//! - `GET /health` - Liveness probe
//! - `POST /api/webhooks/payment` - Payment gateway webhooks

pub mod payment;

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

pub use payment::{webhook_routes, PaymentAppState};

/// Builds the application router. Middleware layers are added by the caller.
pub fn router(state: PaymentAppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/webhooks", webhook_routes())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
