use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::BillingPolicy;
use crate::error::LedgerError;
use crate::models::{Locker, LockerState, Member};
use crate::services::coupon_ledger::{Charge, ChargeOutcome, CouponLedger};
use crate::store::{next_id, ClubStore};

/// Locker lifecycle: Available -> Occupied -> Available, plus Maintenance
pub struct ResourceAssignment<'a> {
    store: &'a mut ClubStore,
    policy: &'a BillingPolicy,
}

impl<'a> ResourceAssignment<'a> {
    pub fn new(store: &'a mut ClubStore, policy: &'a BillingPolicy) -> Self {
        Self { store, policy }
    }

    fn locker_mut(&mut self, locker_id: u32) -> Result<&mut Locker, LedgerError> {
        self.store
            .lockers
            .iter_mut()
            .find(|l| l.id == locker_id)
            .ok_or(LedgerError::LockerNotFound(locker_id))
    }

    pub fn available(&self) -> Vec<&Locker> {
        self.store
            .lockers
            .iter()
            .filter(|l| l.state == LockerState::Available)
            .collect()
    }

    pub fn locker_of(&self, member_id: u32) -> Option<&Locker> {
        Locker::find_by_occupant(self.store, member_id)
    }

    pub fn assign(&mut self, locker_id: u32, member_id: u32) -> Result<(), LedgerError> {
        Locker::find_by_id(self.store, locker_id).ok_or(LedgerError::LockerNotFound(locker_id))?;
        Member::find_by_id(self.store, member_id).ok_or(LedgerError::MemberNotFound(member_id))?;
        if let Some(held) = Locker::find_by_occupant(self.store, member_id) {
            return Err(LedgerError::MemberHasLocker {
                member_id,
                locker_id: held.id,
            });
        }

        let locker = self.locker_mut(locker_id)?;
        if locker.state != LockerState::Available {
            return Err(LedgerError::LockerUnavailable(locker_id));
        }
        locker.state = LockerState::Occupied;
        locker.occupant_id = Some(member_id);

        tracing::info!(locker_id, member_id, "Locker assigned");
        Ok(())
    }

    /// Frees an occupied locker. Coupons already billed keep the rental.
    pub fn release(&mut self, locker_id: u32) -> Result<(), LedgerError> {
        let locker = self.locker_mut(locker_id)?;
        if locker.state != LockerState::Occupied {
            return Err(LedgerError::LockerNotOccupied(locker_id));
        }
        let previous = locker.occupant_id.take();
        locker.state = LockerState::Available;

        tracing::info!(locker_id, member_id = ?previous, "Locker released");
        Ok(())
    }

    /// Assigns the locker and bills its rental.
    ///
    /// Both steps happen or neither does: a ledger refusal hands the locker
    /// back before the error is returned.
    #[tracing::instrument(skip(self))]
    pub fn rent(
        &mut self,
        member_id: u32,
        locker_id: u32,
        today: NaiveDate,
    ) -> Result<ChargeOutcome, LedgerError> {
        self.assign(locker_id, member_id)?;

        let fee = Locker::find_by_id(self.store, locker_id)
            .map(|l| l.rental_cost)
            .ok_or(LedgerError::LockerNotFound(locker_id))?;

        let charged = CouponLedger::new(&mut *self.store, self.policy).apply_charge(
            member_id,
            Charge::Locker { fee },
            today,
        );

        match charged {
            Ok(outcome) => {
                tracing::info!(coupon_id = ?outcome.coupon_id(), fee = %fee, "Locker rented");
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rental charge refused, releasing locker");
                self.release(locker_id)?;
                Err(e)
            }
        }
    }

    pub fn add(&mut self, rental_cost: Decimal) -> Result<Locker, LedgerError> {
        if rental_cost.is_sign_negative() {
            return Err(LedgerError::Validation(format!(
                "rental cost must be non-negative, got {}",
                rental_cost
            )));
        }

        let locker = Locker {
            id: next_id(&self.store.lockers, |l| l.id),
            rental_cost,
            state: LockerState::Available,
            occupant_id: None,
        };
        self.store.lockers.push(locker.clone());

        tracing::info!(locker_id = locker.id, rental_cost = %rental_cost, "Locker added");
        Ok(locker)
    }

    /// Edits rental cost and, for lockers nobody occupies, the state.
    ///
    /// Occupation only happens through `assign`, so `Occupied` is refused here.
    pub fn update(
        &mut self,
        locker_id: u32,
        rental_cost: Decimal,
        state: LockerState,
    ) -> Result<Locker, LedgerError> {
        if rental_cost.is_sign_negative() {
            return Err(LedgerError::Validation(format!(
                "rental cost must be non-negative, got {}",
                rental_cost
            )));
        }

        let locker = self.locker_mut(locker_id)?;
        if locker.state == LockerState::Occupied {
            if state != LockerState::Occupied {
                return Err(LedgerError::LockerOccupied(locker_id));
            }
        } else if state == LockerState::Occupied {
            return Err(LedgerError::LockerUnavailable(locker_id));
        } else {
            locker.state = state;
        }
        locker.rental_cost = rental_cost;

        tracing::info!(locker_id, state = ?locker.state, rental_cost = %rental_cost, "Locker updated");
        Ok(locker.clone())
    }

    pub fn delete(&mut self, locker_id: u32) -> Result<(), LedgerError> {
        let locker = self.locker_mut(locker_id)?;
        if locker.state == LockerState::Occupied {
            return Err(LedgerError::LockerOccupied(locker_id));
        }
        self.store.lockers.retain(|l| l.id != locker_id);

        tracing::info!(locker_id, "Locker deleted");
        Ok(())
    }
}
