use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::AppState;
use crate::services::reports::{self, CollectorDashboard, DashboardStats, SettlementReport};

async fn collector_dashboard(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<CollectorDashboard> {
    let store = state.store.lock();
    Json(reports::collector_dashboard(&store, &name))
}

async fn settlement_report(State(state): State<AppState>) -> Json<SettlementReport> {
    let store = state.store.lock();
    Json(reports::settlement_report(&store))
}

async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let store = state.store.lock();
    Json(reports::dashboard_stats(&store))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/collectors/:name/dashboard", get(collector_dashboard))
        .route("/reports/settlements", get(settlement_report))
        .route("/reports/dashboard", get(dashboard_stats))
}
