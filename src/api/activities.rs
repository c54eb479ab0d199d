use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::api::AppState;
use crate::error::Result;
use crate::models::{Activity, ActivityData};

async fn list_activities(State(state): State<AppState>) -> Json<Vec<Activity>> {
    let store = state.store.lock();
    Json(store.activities.clone())
}

async fn create_activity(
    State(state): State<AppState>,
    Json(data): Json<ActivityData>,
) -> Result<(StatusCode, Json<Activity>)> {
    let mut store = state.store.lock();
    let activity = Activity::create(&mut store, data)?;

    Ok((StatusCode::CREATED, Json(activity)))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(data): Json<ActivityData>,
) -> Result<Json<Activity>> {
    let mut store = state.store.lock();
    let activity = Activity::update(&mut store, id, data)?;

    Ok(Json(activity))
}

async fn delete_activity(State(state): State<AppState>, Path(id): Path<u32>) -> Result<StatusCode> {
    let mut store = state.store.lock();
    Activity::delete(&mut store, id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/:id", put(update_activity).delete(delete_activity))
}
