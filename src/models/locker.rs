use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::ClubStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockerState {
    Available,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locker {
    pub id: u32,
    pub rental_cost: Decimal,
    pub state: LockerState,
    #[serde(default)]
    pub occupant_id: Option<u32>,
}

impl Locker {
    /// Occupied exactly when an occupant is recorded
    pub fn is_consistent(&self) -> bool {
        (self.state == LockerState::Occupied) == self.occupant_id.is_some()
    }

    pub fn find_by_id(store: &ClubStore, id: u32) -> Option<&Self> {
        store.lockers.iter().find(|l| l.id == id)
    }

    /// The locker a member currently occupies, if any
    pub fn find_by_occupant(store: &ClubStore, member_id: u32) -> Option<&Self> {
        store
            .lockers
            .iter()
            .find(|l| l.state == LockerState::Occupied && l.occupant_id == Some(member_id))
    }
}
