use chrono::{DateTime, Utc};

use crate::config::BillingPolicy;
use crate::error::LedgerError;
use crate::models::{CouponState, Payment};
use crate::store::{next_id, ClubStore};

/// Settles coupons and records collector commissions
pub struct PaymentProcessor<'a> {
    store: &'a mut ClubStore,
    policy: &'a BillingPolicy,
}

impl<'a> PaymentProcessor<'a> {
    pub fn new(store: &'a mut ClubStore, policy: &'a BillingPolicy) -> Self {
        Self { store, policy }
    }

    /// Marks the coupon Paid and appends the matching payment.
    ///
    /// Coupons that are already Paid are refused, so a coupon never carries
    /// more than one payment.
    #[tracing::instrument(skip(self))]
    pub fn settle(
        &mut self,
        coupon_id: u32,
        collector: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<Payment, LedgerError> {
        let payment_id = next_id(&self.store.payments, |p| p.id);

        let coupon = self
            .store
            .coupons
            .iter_mut()
            .find(|c| c.id == coupon_id)
            .ok_or(LedgerError::CouponNotFound(coupon_id))?;

        if coupon.state == CouponState::Paid {
            tracing::warn!(member_id = coupon.member_id, "Coupon already settled");
            return Err(LedgerError::AlreadySettled(coupon_id));
        }

        let commission = (coupon.total * self.policy.commission_rate).round_dp(2);
        let payment = Payment {
            id: payment_id,
            coupon_id,
            paid_at,
            amount_paid: coupon.total,
            commission,
            collector: collector.to_string(),
        };
        coupon.state = CouponState::Paid;

        tracing::info!(
            member_id = coupon.member_id,
            payment_id,
            amount = %payment.amount_paid,
            commission = %commission,
            "Coupon settled"
        );
        self.store.payments.push(payment.clone());

        Ok(payment)
    }

    pub fn payments_by_collector(&self, collector: &str) -> Vec<&Payment> {
        Payment::list_by_collector(self.store, collector)
    }
}
