use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::AppState;
use crate::error::Result;
use crate::models::{Locker, LockerState};
use crate::services::ResourceAssignment;

#[derive(Debug, Deserialize)]
pub struct ListLockersQuery {
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLockerRequest {
    pub rental_cost: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLockerRequest {
    pub rental_cost: Decimal,
    pub state: LockerState,
}

#[derive(Debug, Deserialize)]
pub struct AssignLockerRequest {
    pub member_id: u32,
}

async fn list_lockers(
    State(state): State<AppState>,
    Query(query): Query<ListLockersQuery>,
) -> Json<Vec<Locker>> {
    let mut store = state.store.lock();
    let lockers = if query.available.unwrap_or(false) {
        ResourceAssignment::new(&mut store, &state.config.billing)
            .available()
            .into_iter()
            .cloned()
            .collect()
    } else {
        store.lockers.clone()
    };

    Json(lockers)
}

async fn create_locker(
    State(state): State<AppState>,
    Json(req): Json<CreateLockerRequest>,
) -> Result<(StatusCode, Json<Locker>)> {
    let mut store = state.store.lock();
    let locker = ResourceAssignment::new(&mut store, &state.config.billing).add(req.rental_cost)?;

    Ok((StatusCode::CREATED, Json(locker)))
}

async fn update_locker(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdateLockerRequest>,
) -> Result<Json<Locker>> {
    let mut store = state.store.lock();
    let locker = ResourceAssignment::new(&mut store, &state.config.billing).update(
        id,
        req.rental_cost,
        req.state,
    )?;

    Ok(Json(locker))
}

async fn delete_locker(State(state): State<AppState>, Path(id): Path<u32>) -> Result<StatusCode> {
    let mut store = state.store.lock();
    ResourceAssignment::new(&mut store, &state.config.billing).delete(id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Assigns without billing; renting through `/members/:id/locker` also charges
async fn assign_locker(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<AssignLockerRequest>,
) -> Result<StatusCode> {
    let mut store = state.store.lock();
    ResourceAssignment::new(&mut store, &state.config.billing).assign(id, req.member_id)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn release_locker(State(state): State<AppState>, Path(id): Path<u32>) -> Result<StatusCode> {
    let mut store = state.store.lock();
    ResourceAssignment::new(&mut store, &state.config.billing).release(id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lockers", get(list_lockers).post(create_locker))
        .route("/lockers/:id", put(update_locker).delete(delete_locker))
        .route("/lockers/:id/assign", post(assign_locker))
        .route("/lockers/:id/release", post(release_locker))
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{send, test_state};
    use crate::models::LockerState;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_assign_and_release() {
        let state = test_state();

        let (status, _) = send(
            &state,
            Method::POST,
            "/lockers/1/assign",
            Some(json!({ "member_id": 1001 })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.store.lock().lockers[0].occupant_id, Some(1001));
        assert!(state.store.lock().coupons.is_empty());

        let (status, _) = send(&state, Method::POST, "/lockers/1/release", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.store.lock().lockers[0].state, LockerState::Available);
    }

    #[tokio::test]
    async fn test_release_maintenance_locker_conflicts() {
        let state = test_state();

        let (status, body) = send(&state, Method::POST, "/lockers/2/release", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Locker 2 is not occupied");
        assert_eq!(state.store.lock().lockers[1].state, LockerState::Maintenance);
    }

    #[tokio::test]
    async fn test_list_available_and_add() {
        let state = test_state();

        let (status, created) = send(
            &state,
            Method::POST,
            "/lockers",
            Some(json!({ "rental_cost": 650 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 3);

        let (_, all) = send(&state, Method::GET, "/lockers", None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, available) = send(&state, Method::GET, "/lockers?available=true", None).await;
        let ids: Vec<u64> = available
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_puts_locker_back_in_service() {
        let state = test_state();

        let (status, body) = send(
            &state,
            Method::PUT,
            "/lockers/2",
            Some(json!({ "rental_cost": 500, "state": "Available" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "Available");
    }
}
