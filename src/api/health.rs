use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::api::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub store: StoreHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreHealth {
    pub members: usize,
    pub coupons: usize,
    pub payments: usize,
    pub lock_wait_us: u128,
}

/// Health check endpoint
/// Reports how long the store lock took and what it currently holds
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();

    let store = {
        let guard = state.store.lock();
        let lock_wait_us = start.elapsed().as_micros();
        StoreHealth {
            members: guard.members.len(),
            coupons: guard.coupons.len(),
            payments: guard.payments.len(),
            lock_wait_us,
        }
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store,
    };

    tracing::debug!(
        status = %response.status,
        duration_us = start.elapsed().as_micros(),
        "Health check completed"
    );

    (StatusCode::OK, Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
