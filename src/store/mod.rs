use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use crate::models::{Activity, Category, Coupon, Locker, Member, Payment, Zone};

pub mod catalog;

/// Every collection the ledger reads and writes.
///
/// Components borrow the store explicitly; there is no global instance.
#[derive(Debug, Clone, Default)]
pub struct ClubStore {
    pub categories: Vec<Category>,
    pub activities: Vec<Activity>,
    pub zones: Vec<Zone>,
    pub lockers: Vec<Locker>,
    pub members: Vec<Member>,
    pub coupons: Vec<Coupon>,
    pub payments: Vec<Payment>,
}

/// Single-writer handle shared by request handlers
pub type SharedStore = Arc<Mutex<ClubStore>>;

/// Builds the shared store, seeding reference data from `catalog_path` when given
pub fn create_store(catalog_path: Option<&Path>) -> Result<SharedStore, catalog::CatalogError> {
    let store = match catalog_path {
        Some(path) => catalog::load_from_file(path)?,
        None => {
            tracing::warn!("No catalog path configured, starting with an empty store");
            ClubStore::default()
        }
    };

    tracing::info!(
        categories = store.categories.len(),
        activities = store.activities.len(),
        lockers = store.lockers.len(),
        zones = store.zones.len(),
        members = store.members.len(),
        "Store initialized"
    );

    Ok(Arc::new(Mutex::new(store)))
}

/// `max(existing ids) + 1`, or 1 for an empty collection
pub fn next_id<T>(items: &[T], id: impl Fn(&T) -> u32) -> u32 {
    items.iter().map(id).max().map_or(1, |max| max + 1)
}
