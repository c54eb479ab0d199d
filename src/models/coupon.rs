use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Period;
use crate::store::ClubStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouponState {
    Unpaid,
    Paid,
    Overdue,
}

/// An activity charged on a coupon, with the cost it was charged at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCharge {
    pub id: u32,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CouponDetail {
    pub base_fee: Decimal,
    pub locker_rental: Decimal,
    pub activities: Vec<ActivityCharge>,
}

impl CouponDetail {
    pub fn total(&self) -> Decimal {
        self.base_fee + self.locker_rental + self.activities.iter().map(|a| a.cost).sum::<Decimal>()
    }

    pub fn has_activity(&self, activity_id: u32) -> bool {
        self.activities.iter().any(|a| a.id == activity_id)
    }

    pub fn activity_ids(&self) -> Vec<u32> {
        self.activities.iter().map(|a| a.id).collect()
    }

    /// Returns false when the activity is already charged
    pub fn add_activity(&mut self, activity_id: u32, cost: Decimal) -> bool {
        if self.has_activity(activity_id) {
            return false;
        }
        self.activities.push(ActivityCharge {
            id: activity_id,
            cost,
        });
        true
    }

    /// Returns false when the activity was not charged
    pub fn remove_activity(&mut self, activity_id: u32) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != activity_id);
        self.activities.len() != before
    }

    /// Returns false when the rental is already at `fee`
    pub fn set_locker_rental(&mut self, fee: Decimal) -> bool {
        if self.locker_rental == fee {
            return false;
        }
        self.locker_rental = fee;
        true
    }
}

/// A member's invoice for one period.
///
/// `total` always equals `detail.total()`; callers mutate `detail` and then
/// call [`Coupon::recompute_total`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: u32,
    pub member_id: u32,
    pub month: u32,
    pub year: i32,
    pub due_date: NaiveDate,
    pub total: Decimal,
    pub state: CouponState,
    #[serde(default)]
    pub surcharge: Decimal,
    pub detail: CouponDetail,
}

impl Coupon {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }

    /// Only unpaid coupons accept new charges
    pub fn is_open(&self) -> bool {
        self.state == CouponState::Unpaid
    }

    pub fn recompute_total(&mut self) {
        self.total = self.detail.total();
    }

    pub fn find_by_id(store: &ClubStore, id: u32) -> Option<&Self> {
        store.coupons.iter().find(|c| c.id == id)
    }

    pub fn find_for_period(store: &ClubStore, member_id: u32, period: Period) -> Option<&Self> {
        store
            .coupons
            .iter()
            .find(|c| c.member_id == member_id && c.period() == period)
    }

    /// A member's coupons, newest period first
    pub fn list_for_member(store: &ClubStore, member_id: u32) -> Vec<&Self> {
        let mut coupons: Vec<&Self> = store
            .coupons
            .iter()
            .filter(|c| c.member_id == member_id)
            .collect();
        coupons.sort_by(|a, b| b.period().cmp(&a.period()));
        coupons
    }

    /// The coupon with the greatest (year, month) for a member
    pub fn find_latest(store: &ClubStore, member_id: u32) -> Option<&Self> {
        store
            .coupons
            .iter()
            .filter(|c| c.member_id == member_id)
            .max_by_key(|c| c.period())
    }

    /// The latest coupon not issued for a period after `current`
    pub fn find_latest_up_to(store: &ClubStore, member_id: u32, current: Period) -> Option<&Self> {
        store
            .coupons
            .iter()
            .filter(|c| c.member_id == member_id && c.period() <= current)
            .max_by_key(|c| c.period())
    }
}
