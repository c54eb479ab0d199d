use chrono::NaiveDate;

use crate::config::BillingPolicy;
use crate::error::LedgerError;
use crate::models::{Activity, Coupon, Member, Period};
use crate::services::coupon_ledger::{Charge, ChargeOutcome, CouponLedger};
use crate::store::ClubStore;

/// Activity enrollment, recorded as entries on the chargeable coupon
pub struct EnrollmentLedger<'a> {
    store: &'a mut ClubStore,
    policy: &'a BillingPolicy,
}

impl<'a> EnrollmentLedger<'a> {
    pub fn new(store: &'a mut ClubStore, policy: &'a BillingPolicy) -> Self {
        Self { store, policy }
    }

    fn ledger(&mut self) -> CouponLedger<'_> {
        CouponLedger::new(&mut *self.store, self.policy)
    }

    /// Activity ids on the coupon charges currently attach to
    pub fn enrolled_activities(&self, member_id: u32, today: NaiveDate) -> Vec<u32> {
        Coupon::find_latest_up_to(self.store, member_id, Period::of(today))
            .map(|c| c.detail.activity_ids())
            .unwrap_or_default()
    }

    #[tracing::instrument(skip(self))]
    pub fn enroll(
        &mut self,
        member_id: u32,
        activity_id: u32,
        today: NaiveDate,
    ) -> Result<ChargeOutcome, LedgerError> {
        let member =
            Member::find_by_id(self.store, member_id).ok_or(LedgerError::MemberNotFound(member_id))?;
        let delinquent = member.delinquent;
        let cost = Activity::find_by_id(self.store, activity_id)
            .ok_or(LedgerError::ActivityNotFound(activity_id))?
            .cost;

        let chargeable = Coupon::find_latest_up_to(self.store, member_id, Period::of(today))
            .filter(|c| c.detail.has_activity(activity_id))
            .map(|c| c.id);
        if let Some(coupon_id) = chargeable {
            tracing::debug!(coupon_id, "Already enrolled");
            return Ok(ChargeOutcome::Unchanged(Some(coupon_id)));
        }

        if delinquent {
            tracing::warn!("Enrollment refused, member is delinquent");
            return Err(LedgerError::Delinquent(member_id));
        }

        let outcome = self
            .ledger()
            .apply_charge(member_id, Charge::ActivityAdd { activity_id, cost }, today)?;

        tracing::info!(coupon_id = ?outcome.coupon_id(), cost = %cost, "Member enrolled");
        Ok(outcome)
    }

    #[tracing::instrument(skip(self))]
    pub fn unenroll(
        &mut self,
        member_id: u32,
        activity_id: u32,
        today: NaiveDate,
    ) -> Result<ChargeOutcome, LedgerError> {
        Member::find_by_id(self.store, member_id).ok_or(LedgerError::MemberNotFound(member_id))?;

        if !self.enrolled_activities(member_id, today).contains(&activity_id) {
            tracing::debug!("Not enrolled, nothing to remove");
            return Ok(ChargeOutcome::Unchanged(None));
        }

        let outcome = self
            .ledger()
            .apply_charge(member_id, Charge::ActivityRemove { activity_id }, today)?;

        tracing::info!(coupon_id = ?outcome.coupon_id(), "Member unenrolled");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CouponState, CreateMemberData};
    use crate::services::coupon_ledger::tests::{
        assert_totals_consistent, club, coupon, june_2024, MEMBER,
    };
    use rust_decimal::Decimal;

    #[test]
    fn test_enroll_without_coupons_bills_current_period() {
        let mut store = club();
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        let outcome = enrollment.enroll(MEMBER, 1, june_2024()).unwrap();

        assert_eq!(outcome, ChargeOutcome::Created(1));
        assert_eq!(enrollment.enrolled_activities(MEMBER, june_2024()), vec![1]);
        let coupon = Coupon::find_by_id(&store, 1).unwrap();
        assert_eq!(coupon.period(), Period::new(6, 2024).unwrap());
        assert_eq!(coupon.state, CouponState::Unpaid);
        assert_eq!(coupon.total, Decimal::from(2500 + 1200));
    }

    #[test]
    fn test_enroll_on_open_coupon_mutates_in_place() {
        let mut store = club();
        store.coupons.push(coupon(5, 6, 2024, CouponState::Unpaid));
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.enroll(MEMBER, 2, june_2024()),
            Ok(ChargeOutcome::Applied(5))
        );
        assert_eq!(store.coupons.len(), 1);
        assert_eq!(store.coupons[0].total, Decimal::from(3700));
        assert!(store.coupons[0].detail.has_activity(2));
        assert_totals_consistent(&store);
    }

    #[test]
    fn test_double_enrollment_is_idempotent() {
        let mut store = club();
        store.coupons.push(coupon(5, 6, 2024, CouponState::Unpaid));
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        enrollment.enroll(MEMBER, 2, june_2024()).unwrap();
        assert_eq!(
            enrollment.enroll(MEMBER, 2, june_2024()),
            Ok(ChargeOutcome::Unchanged(Some(5)))
        );
        assert_eq!(store.coupons[0].detail.activities.len(), 1);
        assert_eq!(store.coupons[0].total, Decimal::from(3700));
    }

    #[test]
    fn test_enroll_refused_when_next_period_already_billed() {
        let mut store = club();
        store.coupons.push(coupon(5, 6, 2024, CouponState::Paid));
        store.coupons.push(coupon(6, 7, 2024, CouponState::Unpaid));
        let before = store.coupons.clone();
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.enroll(MEMBER, 1, june_2024()),
            Err(LedgerError::PeriodAlreadyBilled(Period::new(7, 2024).unwrap()))
        );
        assert_eq!(store.coupons, before);
    }

    #[test]
    fn test_delinquent_member_cannot_enroll() {
        let mut store = club();
        store.members[0].delinquent = true;
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.enroll(MEMBER, 1, june_2024()),
            Err(LedgerError::Delinquent(MEMBER))
        );
        assert!(store.coupons.is_empty());
    }

    #[test]
    fn test_unknown_member_or_activity() {
        let mut store = club();
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.enroll(7, 1, june_2024()),
            Err(LedgerError::MemberNotFound(7))
        );
        assert_eq!(
            enrollment.enroll(MEMBER, 99, june_2024()),
            Err(LedgerError::ActivityNotFound(99))
        );
    }

    #[test]
    fn test_member_registered_after_deletion_starts_clean() {
        let mut store = club();
        let policy = BillingPolicy::default();
        EnrollmentLedger::new(&mut store, &policy)
            .enroll(MEMBER, 3, june_2024())
            .unwrap();

        Member::delete(&mut store, MEMBER).unwrap();
        let newcomer = Member::create(
            &mut store,
            CreateMemberData {
                first_name: "Eva".into(),
                last_name: "Ruiz".into(),
                email: String::new(),
                phone: String::new(),
                category_id: 1,
                zone_id: 1,
            },
        )
        .unwrap();
        assert_ne!(newcomer.id, MEMBER);

        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);
        assert!(enrollment.enrolled_activities(newcomer.id, june_2024()).is_empty());
        assert_eq!(
            enrollment.enroll(newcomer.id, 1, june_2024()),
            Ok(ChargeOutcome::Created(2))
        );
        let fresh = Coupon::find_by_id(&store, 2).unwrap();
        assert_eq!(fresh.member_id, newcomer.id);
        assert_eq!(fresh.total, Decimal::from(2500 + 1200));
        assert_eq!(Coupon::find_by_id(&store, 1).unwrap().detail.activity_ids(), vec![3]);
    }

    #[test]
    fn test_unenroll_removes_entry() {
        let mut store = club();
        let mut open = coupon(5, 6, 2024, CouponState::Unpaid);
        open.detail.add_activity(3, Decimal::from(4000));
        open.recompute_total();
        store.coupons.push(open);
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.unenroll(MEMBER, 3, june_2024()),
            Ok(ChargeOutcome::Applied(5))
        );
        assert!(enrollment.enrolled_activities(MEMBER, june_2024()).is_empty());
        assert_eq!(store.coupons[0].total, Decimal::from(2500));
    }

    #[test]
    fn test_unenroll_when_not_enrolled_is_noop() {
        let mut store = club();
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.unenroll(MEMBER, 1, june_2024()),
            Ok(ChargeOutcome::Unchanged(None))
        );
        assert!(store.coupons.is_empty());
    }

    #[test]
    fn test_unenroll_after_settlement_opens_next_coupon_without_activity() {
        let mut store = club();
        let mut paid = coupon(5, 6, 2024, CouponState::Paid);
        paid.detail.add_activity(1, Decimal::from(1200));
        paid.detail.add_activity(2, Decimal::from(1200));
        paid.recompute_total();
        store.coupons.push(paid);
        let policy = BillingPolicy::default();
        let mut enrollment = EnrollmentLedger::new(&mut store, &policy);

        assert_eq!(
            enrollment.unenroll(MEMBER, 1, june_2024()),
            Ok(ChargeOutcome::Created(6))
        );
        let next = Coupon::find_by_id(&store, 6).unwrap();
        assert_eq!(next.period(), Period::new(7, 2024).unwrap());
        assert_eq!(next.detail.activity_ids(), vec![2]);
        assert_eq!(next.total, Decimal::from(2500 + 1200));
        assert_eq!(Coupon::find_by_id(&store, 5).unwrap().total, Decimal::from(4900));
    }
}
