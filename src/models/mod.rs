// Models module - ledger entities and their store lookups

pub mod catalog;
pub mod coupon;
pub mod locker;
pub mod member;
pub mod payment;
pub mod period;

pub use catalog::{Activity, ActivityData, Category, Schedule, Zone};
pub use coupon::{ActivityCharge, Coupon, CouponDetail, CouponState};
pub use locker::{Locker, LockerState};
pub use member::{CreateMemberData, Member, UpdateMemberData};
pub use payment::Payment;
pub use period::Period;
