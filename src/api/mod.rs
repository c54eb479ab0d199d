// API module - HTTP endpoints

use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::models::Coupon;
use crate::services::ChargeOutcome;
use crate::store::{ClubStore, SharedStore};

pub mod activities;
pub mod coupons;
pub mod health;
pub mod lockers;
pub mod members;
pub mod reports;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
}

/// Result of a billing operation, with the coupon it touched
#[derive(Debug, Serialize)]
pub struct ChargeResponse {
    #[serde(flatten)]
    pub outcome: ChargeOutcome,
    pub coupon: Option<Coupon>,
}

impl ChargeResponse {
    fn new(store: &ClubStore, outcome: ChargeOutcome) -> Self {
        Self {
            outcome,
            coupon: outcome
                .coupon_id()
                .and_then(|id| Coupon::find_by_id(store, id))
                .cloned(),
        }
    }
}

/// Billing periods follow the server's UTC calendar
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(members::router())
        .merge(activities::router())
        .merge(lockers::router())
        .merge(coupons::router())
        .merge(reports::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
