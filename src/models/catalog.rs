use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::store::{next_id, ClubStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub monthly_fee: Decimal,
}

impl Category {
    pub fn find_by_id(store: &ClubStore, id: u32) -> Option<&Self> {
        store.categories.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    Morning,
    Afternoon,
    Evening,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub name: String,
    pub cost: Decimal,
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityData {
    pub name: String,
    pub cost: Decimal,
    pub schedule: Schedule,
}

impl ActivityData {
    fn validate(&self) -> Result<(), LedgerError> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Activity name is required".to_string(),
            ));
        }
        if self.cost.is_sign_negative() {
            return Err(LedgerError::Validation(format!(
                "Activity cost must be non-negative, got {}",
                self.cost
            )));
        }
        Ok(())
    }
}

impl Activity {
    /// Adds an activity to the catalog
    pub fn create(store: &mut ClubStore, data: ActivityData) -> Result<Self, LedgerError> {
        data.validate()?;

        let activity = Activity {
            id: next_id(&store.activities, |a| a.id),
            name: data.name.trim().to_string(),
            cost: data.cost,
            schedule: data.schedule,
        };
        store.activities.push(activity.clone());

        tracing::info!(activity_id = activity.id, cost = %activity.cost, "Activity created");
        Ok(activity)
    }

    pub fn find_by_id(store: &ClubStore, id: u32) -> Option<&Self> {
        store.activities.iter().find(|a| a.id == id)
    }

    /// Replaces name, cost and schedule.
    ///
    /// Coupons already issued keep the cost they were charged with.
    pub fn update(store: &mut ClubStore, id: u32, data: ActivityData) -> Result<Self, LedgerError> {
        data.validate()?;

        let activity = store
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(LedgerError::ActivityNotFound(id))?;

        activity.name = data.name.trim().to_string();
        activity.cost = data.cost;
        activity.schedule = data.schedule;

        tracing::info!(activity_id = id, cost = %activity.cost, "Activity updated");
        Ok(activity.clone())
    }

    pub fn delete(store: &mut ClubStore, id: u32) -> Result<(), LedgerError> {
        let before = store.activities.len();
        store.activities.retain(|a| a.id != id);
        if store.activities.len() == before {
            return Err(LedgerError::ActivityNotFound(id));
        }

        tracing::info!(activity_id = id, "Activity deleted");
        Ok(())
    }
}

/// A collection zone and the collector who visits it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    pub collector: String,
}

impl Zone {
    pub fn find_by_id(store: &ClubStore, id: u32) -> Option<&Self> {
        store.zones.iter().find(|z| z.id == id)
    }

    pub fn ids_for_collector(store: &ClubStore, collector: &str) -> Vec<u32> {
        store
            .zones
            .iter()
            .filter(|z| z.collector == collector)
            .map(|z| z.id)
            .collect()
    }
}
