use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::period::Period;
use crate::store::catalog::CatalogError;

/// Refusals raised by the billing ledger and the components feeding it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Locker {0} is not available")]
    LockerUnavailable(u32),

    #[error("Locker {0} is not occupied")]
    LockerNotOccupied(u32),

    #[error("Locker {0} is occupied")]
    LockerOccupied(u32),

    #[error("Period {0} is already billed")]
    PeriodAlreadyBilled(Period),

    #[error("Coupon not found: {0}")]
    CouponNotFound(u32),

    #[error("Member not found: {0}")]
    MemberNotFound(u32),

    #[error("Activity not found: {0}")]
    ActivityNotFound(u32),

    #[error("Locker not found: {0}")]
    LockerNotFound(u32),

    #[error("Category not found: {0}")]
    CategoryNotFound(u32),

    #[error("Zone not found: {0}")]
    ZoneNotFound(u32),

    #[error("Member {member_id} already occupies locker {locker_id}")]
    MemberHasLocker { member_id: u32, locker_id: u32 },

    #[error("Member {0} is delinquent")]
    Delinquent(u32),

    #[error("Coupon {0} is already settled")]
    AlreadySettled(u32),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl LedgerError {
    fn status(&self) -> StatusCode {
        match self {
            LedgerError::CouponNotFound(_)
            | LedgerError::MemberNotFound(_)
            | LedgerError::ActivityNotFound(_)
            | LedgerError::LockerNotFound(_)
            | LedgerError::CategoryNotFound(_)
            | LedgerError::ZoneNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::LockerUnavailable(_)
            | LedgerError::LockerNotOccupied(_)
            | LedgerError::LockerOccupied(_)
            | LedgerError::PeriodAlreadyBilled(_)
            | LedgerError::MemberHasLocker { .. }
            | LedgerError::AlreadySettled(_) => StatusCode::CONFLICT,
            LedgerError::Delinquent(_) => StatusCode::FORBIDDEN,
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_debug = format!("{:?}", self);

        let (status, error_message) = match self {
            AppError::Ledger(e) => (e.status(), e.to_string()),
            AppError::Catalog(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %error_debug, "Request failed");
        } else {
            tracing::warn!(status = %status, message = %error_message, "Request refused");
        }

        let body = Json(json!({
            "error": error_debug,
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
