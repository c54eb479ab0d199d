use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::AppState;
use crate::error::{AppError, LedgerError, Result};
use crate::models::{Coupon, CouponDetail, Payment};
use crate::services::reports::{self, CouponListing};
use crate::services::PaymentProcessor;

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub collector: String,
}

async fn list_coupons(State(state): State<AppState>) -> Json<Vec<CouponListing>> {
    let store = state.store.lock();
    Json(reports::coupon_listing(&store))
}

async fn coupon_snapshot(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<CouponDetail>> {
    let store = state.store.lock();
    let detail = Coupon::find_by_id(&store, id)
        .map(|c| c.detail.clone())
        .ok_or(LedgerError::CouponNotFound(id))?;

    Ok(Json(detail))
}

async fn settle_coupon(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<Payment>> {
    let collector = req.collector.trim();
    if collector.is_empty() {
        return Err(AppError::Validation("Collector name is required".to_string()));
    }

    let mut store = state.store.lock();
    let payment =
        PaymentProcessor::new(&mut store, &state.config.billing).settle(id, collector, Utc::now())?;

    Ok(Json(payment))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coupons", get(list_coupons))
        .route("/coupons/:id/snapshot", get(coupon_snapshot))
        .route("/coupons/:id/settle", post(settle_coupon))
}
