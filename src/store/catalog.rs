use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::models::{Activity, Category, Locker, Member, Zone};
use crate::store::ClubStore;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Reference data seeded at startup
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub lockers: Vec<Locker>,
    #[serde(default)]
    pub members: Vec<Member>,
}

fn ensure_unique<T>(items: &[T], id: impl Fn(&T) -> u32, kind: &str) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for item in items {
        let id = id(item);
        if !seen.insert(id) {
            return Err(CatalogError::Invalid(format!("duplicate {} id {}", kind, id)));
        }
    }
    Ok(())
}

impl CatalogSeed {
    fn validate(&self) -> Result<(), CatalogError> {
        ensure_unique(&self.categories, |c| c.id, "category")?;
        ensure_unique(&self.activities, |a| a.id, "activity")?;
        ensure_unique(&self.zones, |z| z.id, "zone")?;
        ensure_unique(&self.lockers, |l| l.id, "locker")?;
        ensure_unique(&self.members, |m| m.id, "member")?;

        let category_ids: HashSet<u32> = self.categories.iter().map(|c| c.id).collect();
        let zone_ids: HashSet<u32> = self.zones.iter().map(|z| z.id).collect();
        let member_ids: HashSet<u32> = self.members.iter().map(|m| m.id).collect();

        for member in &self.members {
            if !category_ids.contains(&member.category_id) {
                return Err(CatalogError::Invalid(format!(
                    "member {} references unknown category {}",
                    member.id, member.category_id
                )));
            }
            if !zone_ids.contains(&member.zone_id) {
                return Err(CatalogError::Invalid(format!(
                    "member {} references unknown zone {}",
                    member.id, member.zone_id
                )));
            }
        }

        let mut occupants = HashSet::new();
        for locker in &self.lockers {
            if !locker.is_consistent() {
                return Err(CatalogError::Invalid(format!(
                    "locker {} state {:?} does not match its occupant",
                    locker.id, locker.state
                )));
            }
            if let Some(member_id) = locker.occupant_id {
                if !member_ids.contains(&member_id) {
                    return Err(CatalogError::Invalid(format!(
                        "locker {} occupied by unknown member {}",
                        locker.id, member_id
                    )));
                }
                if !occupants.insert(member_id) {
                    return Err(CatalogError::Invalid(format!(
                        "member {} occupies more than one locker",
                        member_id
                    )));
                }
            }
        }

        let negative_fee = self.categories.iter().any(|c| c.monthly_fee.is_sign_negative())
            || self.activities.iter().any(|a| a.cost.is_sign_negative())
            || self.lockers.iter().any(|l| l.rental_cost.is_sign_negative());
        if negative_fee {
            return Err(CatalogError::Invalid(
                "monetary values must be non-negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn into_store(self) -> Result<ClubStore, CatalogError> {
        self.validate()?;

        Ok(ClubStore {
            categories: self.categories,
            activities: self.activities,
            zones: self.zones,
            lockers: self.lockers,
            members: self.members,
            ..Default::default()
        })
    }
}

pub fn load_from_str(json: &str) -> Result<ClubStore, CatalogError> {
    let seed: CatalogSeed = serde_json::from_str(json)?;
    seed.into_store()
}

pub fn load_from_file(path: &Path) -> Result<ClubStore, CatalogError> {
    tracing::info!(path = %path.display(), "Loading catalog");
    let json = std::fs::read_to_string(path)?;
    load_from_str(&json)
}
