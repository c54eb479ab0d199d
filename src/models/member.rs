use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{Category, Locker, Zone};
use crate::store::{next_id, ClubStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub category_id: u32,
    pub zone_id: u32,
    #[serde(default)]
    pub delinquent: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberData {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub category_id: u32,
    pub zone_id: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category_id: Option<u32>,
    pub zone_id: Option<u32>,
    pub delinquent: Option<bool>,
}

fn check_references(store: &ClubStore, category_id: u32, zone_id: u32) -> Result<(), LedgerError> {
    Category::find_by_id(store, category_id).ok_or(LedgerError::CategoryNotFound(category_id))?;
    Zone::find_by_id(store, zone_id).ok_or(LedgerError::ZoneNotFound(zone_id))?;
    Ok(())
}

// Ids still referenced by coupons of deleted members are never handed out again
fn next_member_id(store: &ClubStore) -> u32 {
    next_id(&store.members, |m| m.id).max(next_id(&store.coupons, |c| c.member_id))
}

impl Member {
    /// "Last, First", the way listings show members
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Registers a new member, never delinquent on creation
    pub fn create(store: &mut ClubStore, data: CreateMemberData) -> Result<Self, LedgerError> {
        if data.first_name.trim().is_empty() || data.last_name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "First and last name are required".to_string(),
            ));
        }
        check_references(store, data.category_id, data.zone_id)?;

        let member = Member {
            id: next_member_id(store),
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            email: data.email,
            phone: data.phone,
            category_id: data.category_id,
            zone_id: data.zone_id,
            delinquent: false,
        };
        store.members.push(member.clone());

        tracing::info!(member_id = member.id, "Member created");
        Ok(member)
    }

    pub fn find_by_id(store: &ClubStore, id: u32) -> Option<&Self> {
        store.members.iter().find(|m| m.id == id)
    }

    /// Updates only the provided fields
    pub fn update(store: &mut ClubStore, id: u32, data: UpdateMemberData) -> Result<Self, LedgerError> {
        let current = Self::find_by_id(store, id).ok_or(LedgerError::MemberNotFound(id))?;
        check_references(
            store,
            data.category_id.unwrap_or(current.category_id),
            data.zone_id.unwrap_or(current.zone_id),
        )?;

        let member = store
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(LedgerError::MemberNotFound(id))?;

        if let Some(first_name) = data.first_name {
            member.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            member.last_name = last_name;
        }
        if let Some(email) = data.email {
            member.email = email;
        }
        if let Some(phone) = data.phone {
            member.phone = phone;
        }
        if let Some(category_id) = data.category_id {
            member.category_id = category_id;
        }
        if let Some(zone_id) = data.zone_id {
            member.zone_id = zone_id;
        }
        if let Some(delinquent) = data.delinquent {
            member.delinquent = delinquent;
        }

        tracing::info!(member_id = id, delinquent = member.delinquent, "Member updated");
        Ok(member.clone())
    }

    /// Removes a member. Coupons and payments stay in the ledger.
    pub fn delete(store: &mut ClubStore, id: u32) -> Result<(), LedgerError> {
        Self::find_by_id(store, id).ok_or(LedgerError::MemberNotFound(id))?;
        if let Some(locker) = Locker::find_by_occupant(store, id) {
            return Err(LedgerError::LockerOccupied(locker.id));
        }

        store.members.retain(|m| m.id != id);

        tracing::info!(member_id = id, "Member deleted");
        Ok(())
    }
}
