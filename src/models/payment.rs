use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::ClubStore;

/// A settled coupon. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u32,
    pub coupon_id: u32,
    pub paid_at: DateTime<Utc>,
    pub amount_paid: Decimal,
    pub commission: Decimal,
    pub collector: String,
}

impl Payment {
    pub fn find_by_coupon(store: &ClubStore, coupon_id: u32) -> Vec<&Self> {
        store
            .payments
            .iter()
            .filter(|p| p.coupon_id == coupon_id)
            .collect()
    }

    /// Payments recorded by a collector, newest first
    pub fn list_by_collector<'a>(store: &'a ClubStore, collector: &str) -> Vec<&'a Self> {
        let mut payments: Vec<&Self> = store
            .payments
            .iter()
            .filter(|p| p.collector == collector)
            .collect();
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at).then(b.id.cmp(&a.id)));
        payments
    }
}
