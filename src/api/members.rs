use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::{today, AppState, ChargeResponse};
use crate::error::{AppError, LedgerError, Result};
use crate::models::{Coupon, CreateMemberData, Member, UpdateMemberData};
use crate::services::reports::{self, MemberPortal};
use crate::services::{EnrollmentLedger, ResourceAssignment};

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub activity_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct RentLockerRequest {
    pub locker_id: u32,
}

async fn list_members(State(state): State<AppState>) -> Json<Vec<Member>> {
    let store = state.store.lock();
    Json(store.members.clone())
}

async fn create_member(
    State(state): State<AppState>,
    Json(data): Json<CreateMemberData>,
) -> Result<(StatusCode, Json<Member>)> {
    let mut store = state.store.lock();
    let member = Member::create(&mut store, data)?;

    Ok((StatusCode::CREATED, Json(member)))
}

async fn get_member(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Member>> {
    let store = state.store.lock();
    let member = Member::find_by_id(&store, id).ok_or(LedgerError::MemberNotFound(id))?;

    Ok(Json(member.clone()))
}

async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(data): Json<UpdateMemberData>,
) -> Result<Json<Member>> {
    let mut store = state.store.lock();
    let member = Member::update(&mut store, id, data)?;

    Ok(Json(member))
}

async fn delete_member(State(state): State<AppState>, Path(id): Path<u32>) -> Result<StatusCode> {
    let mut store = state.store.lock();
    Member::delete(&mut store, id)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn member_portal(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<MemberPortal>> {
    let store = state.store.lock();
    let portal = reports::member_portal(&store, id, today())?;

    Ok(Json(portal))
}

async fn latest_coupon(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Coupon>> {
    let store = state.store.lock();
    Member::find_by_id(&store, id).ok_or(LedgerError::MemberNotFound(id))?;

    let coupon = Coupon::find_latest(&store, id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No coupons for member {}", id)))?;

    Ok(Json(coupon))
}

async fn enroll(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<ChargeResponse>> {
    let mut store = state.store.lock();
    let outcome =
        EnrollmentLedger::new(&mut store, &state.config.billing).enroll(id, req.activity_id, today())?;

    Ok(Json(ChargeResponse::new(&store, outcome)))
}

async fn unenroll(
    State(state): State<AppState>,
    Path((id, activity_id)): Path<(u32, u32)>,
) -> Result<Json<ChargeResponse>> {
    let mut store = state.store.lock();
    let outcome =
        EnrollmentLedger::new(&mut store, &state.config.billing).unenroll(id, activity_id, today())?;

    Ok(Json(ChargeResponse::new(&store, outcome)))
}

async fn rent_locker(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<RentLockerRequest>,
) -> Result<Json<ChargeResponse>> {
    let mut store = state.store.lock();
    let outcome =
        ResourceAssignment::new(&mut store, &state.config.billing).rent(id, req.locker_id, today())?;

    Ok(Json(ChargeResponse::new(&store, outcome)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/members/:id/portal", get(member_portal))
        .route("/members/:id/coupons/latest", get(latest_coupon))
        .route("/members/:id/enrollments", post(enroll))
        .route("/members/:id/enrollments/:activity_id", delete(unenroll))
        .route("/members/:id/locker", post(rent_locker))
}
