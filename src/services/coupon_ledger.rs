use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::BillingPolicy;
use crate::error::LedgerError;
use crate::models::{Category, Coupon, CouponDetail, CouponState, Locker, Member, Period};
use crate::store::{next_id, ClubStore};

/// A change to what a member is billed for
#[derive(Debug, Clone, PartialEq)]
pub enum Charge {
    Locker { fee: Decimal },
    ActivityAdd { activity_id: u32, cost: Decimal },
    ActivityRemove { activity_id: u32 },
}

impl Charge {
    /// Applies the charge to a detail, returning whether anything changed
    fn apply_to(&self, detail: &mut CouponDetail) -> bool {
        match self {
            Charge::Locker { fee } => detail.set_locker_rental(*fee),
            Charge::ActivityAdd { activity_id, cost } => detail.add_activity(*activity_id, *cost),
            Charge::ActivityRemove { activity_id } => detail.remove_activity(*activity_id),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Charge::Locker { .. } => "locker",
            Charge::ActivityAdd { .. } => "activity_add",
            Charge::ActivityRemove { .. } => "activity_remove",
        }
    }
}

/// Where a charge landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "coupon_id", rename_all = "snake_case")]
pub enum ChargeOutcome {
    /// Mutated the open chargeable coupon
    Applied(u32),
    /// Folded a locker rental into a coupon already issued for the next period
    Merged(u32),
    /// Opened a new coupon for the charge
    Created(u32),
    /// Nothing to do; carries the coupon that already reflects the charge, if any
    Unchanged(Option<u32>),
}

impl ChargeOutcome {
    pub fn coupon_id(&self) -> Option<u32> {
        match self {
            ChargeOutcome::Applied(id) | ChargeOutcome::Merged(id) | ChargeOutcome::Created(id) => {
                Some(*id)
            }
            ChargeOutcome::Unchanged(id) => *id,
        }
    }
}

/// Single writer of coupon state
pub struct CouponLedger<'a> {
    store: &'a mut ClubStore,
    policy: &'a BillingPolicy,
}

impl<'a> CouponLedger<'a> {
    pub fn new(store: &'a mut ClubStore, policy: &'a BillingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn latest_coupon(&self, member_id: u32) -> Option<&Coupon> {
        Coupon::find_latest(self.store, member_id)
    }

    /// The coupon new charges attach to as of `today`
    pub fn chargeable_coupon(&self, member_id: u32, today: NaiveDate) -> Option<&Coupon> {
        Coupon::find_latest_up_to(self.store, member_id, Period::of(today))
    }

    /// A member's coupons, newest period first
    pub fn coupons_for_member(&self, member_id: u32) -> Vec<&Coupon> {
        Coupon::list_for_member(self.store, member_id)
    }

    pub fn settlement_snapshot(&self, coupon_id: u32) -> Result<CouponDetail, LedgerError> {
        Coupon::find_by_id(self.store, coupon_id)
            .map(|c| c.detail.clone())
            .ok_or(LedgerError::CouponNotFound(coupon_id))
    }

    /// Routes a charge to the member's open coupon, or to the following period.
    ///
    /// An open chargeable coupon is mutated in place. Otherwise the charge
    /// targets the period after the chargeable coupon (or the current period
    /// when there is none). A coupon already issued for that period absorbs
    /// locker charges while it is unpaid but refuses activity charges with
    /// `PeriodAlreadyBilled`. With no coupon there, a new one is opened,
    /// carrying the chargeable coupon's activities.
    #[tracing::instrument(skip(self), fields(kind = charge.kind()))]
    pub fn apply_charge(
        &mut self,
        member_id: u32,
        charge: Charge,
        today: NaiveDate,
    ) -> Result<ChargeOutcome, LedgerError> {
        let member =
            Member::find_by_id(self.store, member_id).ok_or(LedgerError::MemberNotFound(member_id))?;
        let category_id = member.category_id;

        let chargeable = self
            .chargeable_coupon(member_id, today)
            .map(|c| (c.id, c.state, c.period(), c.detail.activities.clone()));

        if let Some((coupon_id, CouponState::Unpaid, _, _)) = chargeable {
            let coupon = self
                .store
                .coupons
                .iter_mut()
                .find(|c| c.id == coupon_id)
                .ok_or(LedgerError::CouponNotFound(coupon_id))?;

            if !charge.apply_to(&mut coupon.detail) {
                tracing::debug!(coupon_id, "Charge already reflected on open coupon");
                return Ok(ChargeOutcome::Unchanged(Some(coupon_id)));
            }
            coupon.recompute_total();

            tracing::info!(coupon_id, total = %coupon.total, "Charge applied to open coupon");
            return Ok(ChargeOutcome::Applied(coupon_id));
        }

        let target = match &chargeable {
            Some((_, _, period, _)) => period.next(),
            None => Period::of(today),
        };

        if let Some(existing) = Coupon::find_for_period(self.store, member_id, target) {
            let existing_id = existing.id;
            let existing_open = existing.is_open();

            return match charge {
                Charge::Locker { .. } if existing_open => {
                    let coupon = self
                        .store
                        .coupons
                        .iter_mut()
                        .find(|c| c.id == existing_id)
                        .ok_or(LedgerError::CouponNotFound(existing_id))?;

                    if !charge.apply_to(&mut coupon.detail) {
                        return Ok(ChargeOutcome::Unchanged(Some(existing_id)));
                    }
                    coupon.recompute_total();

                    tracing::info!(
                        coupon_id = existing_id,
                        period = %target,
                        total = %coupon.total,
                        "Locker rental merged into next-period coupon"
                    );
                    Ok(ChargeOutcome::Merged(existing_id))
                }
                _ => {
                    tracing::warn!(
                        coupon_id = existing_id,
                        period = %target,
                        "Charge refused, period already billed"
                    );
                    Err(LedgerError::PeriodAlreadyBilled(target))
                }
            };
        }

        let base_fee = Category::find_by_id(self.store, category_id)
            .ok_or(LedgerError::CategoryNotFound(category_id))?
            .monthly_fee;
        let locker_rental = Locker::find_by_occupant(self.store, member_id)
            .map(|l| l.rental_cost)
            .unwrap_or(Decimal::ZERO);
        let activities = chargeable.map(|(_, _, _, a)| a).unwrap_or_default();

        let mut detail = CouponDetail {
            base_fee,
            locker_rental,
            activities,
        };
        let changed = charge.apply_to(&mut detail);
        if !changed && !matches!(charge, Charge::Locker { .. }) {
            tracing::debug!(period = %target, "Activity charge is a no-op, no coupon opened");
            return Ok(ChargeOutcome::Unchanged(None));
        }

        let due_date = target.due_date(self.policy.due_day).ok_or_else(|| {
            LedgerError::Validation(format!("no due date for period {}", target))
        })?;

        let mut coupon = Coupon {
            id: next_id(&self.store.coupons, |c| c.id),
            member_id,
            month: target.month,
            year: target.year,
            due_date,
            total: Decimal::ZERO,
            state: CouponState::Unpaid,
            surcharge: Decimal::ZERO,
            detail,
        };
        coupon.recompute_total();
        let coupon_id = coupon.id;

        tracing::info!(
            coupon_id,
            period = %target,
            total = %coupon.total,
            "Coupon opened"
        );
        self.store.coupons.push(coupon);

        Ok(ChargeOutcome::Created(coupon_id))
    }
}
