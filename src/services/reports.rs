// Read-only views over the store for listings and dashboards

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{
    Activity, Category, Coupon, CouponState, Locker, LockerState, Member, Payment, Period, Zone,
};
use crate::store::ClubStore;

const UNKNOWN_MEMBER: &str = "Unknown member";
const RECENT_PAYMENTS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct CouponListing {
    #[serde(flatten)]
    pub coupon: Coupon,
    pub member_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectorMember {
    pub member: Member,
    pub latest_coupon: Option<Coupon>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectorStats {
    pub total_collected: Decimal,
    pub commission_earned: Decimal,
    pub pending_collections: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectorDashboard {
    pub collector: String,
    pub members: Vec<CollectorMember>,
    pub stats: CollectorStats,
    pub recent_payments: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub member_name: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    pub payments: Vec<SettlementRow>,
    pub total_collected: Decimal,
    pub total_commission: Decimal,
    pub net_to_remit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub members: usize,
    pub activities: usize,
    pub occupied_lockers: usize,
    pub delinquent_members: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalActivity {
    #[serde(flatten)]
    pub activity: Activity,
    pub enrolled: bool,
}

/// Everything a member sees on their own page
#[derive(Debug, Clone, Serialize)]
pub struct MemberPortal {
    pub member: Member,
    pub category: Option<Category>,
    pub locker: Option<Locker>,
    pub coupons: Vec<Coupon>,
    pub enrolled_activity_ids: Vec<u32>,
    pub activities: Vec<PortalActivity>,
    pub available_lockers: Vec<Locker>,
    pub has_unpaid_invoice: bool,
}

fn member_name(store: &ClubStore, member_id: u32) -> String {
    Member::find_by_id(store, member_id)
        .map(Member::display_name)
        .unwrap_or_else(|| UNKNOWN_MEMBER.to_string())
}

fn is_pending(coupon: &Coupon) -> bool {
    matches!(coupon.state, CouponState::Unpaid | CouponState::Overdue)
}

// Overdue first, members without coupons last
fn status_priority(coupon: Option<&Coupon>) -> u8 {
    match coupon.map(|c| c.state) {
        Some(CouponState::Overdue) => 0,
        Some(CouponState::Unpaid) => 1,
        Some(CouponState::Paid) => 2,
        None => 3,
    }
}

/// All coupons, newest period first
pub fn coupon_listing(store: &ClubStore) -> Vec<CouponListing> {
    let mut coupons: Vec<&Coupon> = store.coupons.iter().collect();
    coupons.sort_by(|a, b| {
        b.period()
            .cmp(&a.period())
            .then(a.member_id.cmp(&b.member_id))
    });

    coupons
        .into_iter()
        .map(|c| CouponListing {
            coupon: c.clone(),
            member_name: member_name(store, c.member_id),
        })
        .collect()
}

pub fn collector_dashboard(store: &ClubStore, collector: &str) -> CollectorDashboard {
    let zone_ids = Zone::ids_for_collector(store, collector);

    let mut members: Vec<CollectorMember> = store
        .members
        .iter()
        .filter(|m| zone_ids.contains(&m.zone_id))
        .map(|m| CollectorMember {
            member: m.clone(),
            latest_coupon: Coupon::find_latest(store, m.id).cloned(),
        })
        .collect();
    members.sort_by(|a, b| {
        status_priority(a.latest_coupon.as_ref())
            .cmp(&status_priority(b.latest_coupon.as_ref()))
            .then_with(|| a.member.display_name().cmp(&b.member.display_name()))
    });

    let payments = Payment::list_by_collector(store, collector);
    let stats = CollectorStats {
        total_collected: payments.iter().map(|p| p.amount_paid).sum(),
        commission_earned: payments.iter().map(|p| p.commission).sum(),
        pending_collections: members
            .iter()
            .filter(|m| m.latest_coupon.as_ref().is_some_and(is_pending))
            .count(),
    };

    tracing::debug!(
        collector,
        members = members.len(),
        pending = stats.pending_collections,
        "Collector dashboard built"
    );

    CollectorDashboard {
        collector: collector.to_string(),
        members,
        stats,
        recent_payments: payments.into_iter().take(RECENT_PAYMENTS).cloned().collect(),
    }
}

/// Every payment with its member and period, newest first
pub fn settlement_report(store: &ClubStore) -> SettlementReport {
    let mut payments: Vec<&Payment> = store.payments.iter().collect();
    payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at).then(b.id.cmp(&a.id)));

    let rows: Vec<SettlementRow> = payments
        .into_iter()
        .map(|p| {
            let coupon = Coupon::find_by_id(store, p.coupon_id);
            SettlementRow {
                payment: p.clone(),
                member_name: coupon
                    .map(|c| member_name(store, c.member_id))
                    .unwrap_or_else(|| UNKNOWN_MEMBER.to_string()),
                period: coupon
                    .map(|c| c.period().to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            }
        })
        .collect();

    let total_collected: Decimal = rows.iter().map(|r| r.payment.amount_paid).sum();
    let total_commission: Decimal = rows.iter().map(|r| r.payment.commission).sum();

    SettlementReport {
        payments: rows,
        total_collected,
        total_commission,
        net_to_remit: total_collected - total_commission,
    }
}

pub fn dashboard_stats(store: &ClubStore) -> DashboardStats {
    DashboardStats {
        members: store.members.len(),
        activities: store.activities.len(),
        occupied_lockers: store
            .lockers
            .iter()
            .filter(|l| l.state == LockerState::Occupied)
            .count(),
        delinquent_members: store.members.iter().filter(|m| m.delinquent).count(),
    }
}

pub fn member_portal(
    store: &ClubStore,
    member_id: u32,
    today: NaiveDate,
) -> Result<MemberPortal, LedgerError> {
    let member = Member::find_by_id(store, member_id).ok_or(LedgerError::MemberNotFound(member_id))?;

    let enrolled_activity_ids = Coupon::find_latest_up_to(store, member_id, Period::of(today))
        .map(|c| c.detail.activity_ids())
        .unwrap_or_default();

    let activities: Vec<PortalActivity> = store
        .activities
        .iter()
        .map(|a| PortalActivity {
            activity: a.clone(),
            enrolled: enrolled_activity_ids.contains(&a.id),
        })
        .collect();

    Ok(MemberPortal {
        member: member.clone(),
        category: Category::find_by_id(store, member.category_id).cloned(),
        locker: Locker::find_by_occupant(store, member_id).cloned(),
        coupons: Coupon::list_for_member(store, member_id)
            .into_iter()
            .cloned()
            .collect(),
        enrolled_activity_ids,
        activities,
        available_lockers: store
            .lockers
            .iter()
            .filter(|l| l.state == LockerState::Available)
            .cloned()
            .collect(),
        has_unpaid_invoice: Coupon::find_latest(store, member_id).is_some_and(is_pending),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::coupon_ledger::tests::{club, coupon, june_2024, MEMBER};
    use chrono::{TimeZone, Utc};

    fn payment(id: u32, coupon_id: u32, day: u32, amount: i64, collector: &str) -> Payment {
        Payment {
            id,
            coupon_id,
            paid_at: Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap(),
            amount_paid: Decimal::from(amount),
            commission: Decimal::from(amount) * Decimal::new(5, 2),
            collector: collector.to_string(),
        }
    }

    fn add_member(store: &mut ClubStore, id: u32, first: &str, last: &str, zone_id: u32) {
        let mut member = store.members[0].clone();
        member.id = id;
        member.first_name = first.to_string();
        member.last_name = last.to_string();
        member.zone_id = zone_id;
        store.members.push(member);
    }

    #[test]
    fn test_coupon_listing_order_and_names() {
        let mut store = club();
        add_member(&mut store, 900, "Ana", "Lopez", 1);
        store.coupons.push(coupon(1, 5, 2024, CouponState::Paid));
        store.coupons.push(coupon(2, 6, 2024, CouponState::Unpaid));
        let mut other = coupon(3, 6, 2024, CouponState::Unpaid);
        other.member_id = 900;
        store.coupons.push(other);
        let mut orphan = coupon(4, 1, 2023, CouponState::Paid);
        orphan.member_id = 77;
        store.coupons.push(orphan);

        let listing = coupon_listing(&store);

        let ids: Vec<u32> = listing.iter().map(|l| l.coupon.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
        assert_eq!(listing[0].member_name, "Lopez, Ana");
        assert_eq!(listing[1].member_name, "Garcia, Juan");
        assert_eq!(listing[3].member_name, "Unknown member");
    }

    #[test]
    fn test_collector_dashboard() {
        let mut store = club();
        store.zones.push(Zone {
            id: 2,
            name: "South".into(),
            collector: "Gomez".into(),
        });
        add_member(&mut store, 2, "Ana", "Lopez", 1);
        add_member(&mut store, 3, "Luis", "Diaz", 1);
        add_member(&mut store, 4, "Eva", "Ruiz", 2);

        store.coupons.push(coupon(1, 6, 2024, CouponState::Paid));
        let mut overdue = coupon(2, 5, 2024, CouponState::Overdue);
        overdue.member_id = 2;
        store.coupons.push(overdue);
        store.payments.push(payment(1, 1, 12, 2500, "Perez"));
        store.payments.push(payment(2, 9, 13, 1000, "Gomez"));

        let dashboard = collector_dashboard(&store, "Perez");

        let order: Vec<u32> = dashboard.members.iter().map(|m| m.member.id).collect();
        assert_eq!(order, vec![2, MEMBER, 3]);
        assert_eq!(
            dashboard.stats,
            CollectorStats {
                total_collected: Decimal::from(2500),
                commission_earned: Decimal::from(125),
                pending_collections: 1,
            }
        );
        assert_eq!(dashboard.recent_payments.len(), 1);
    }

    #[test]
    fn test_recent_payments_are_capped() {
        let mut store = club();
        for id in 1..=12 {
            store.payments.push(payment(id, id, id, 100, "Perez"));
        }

        let dashboard = collector_dashboard(&store, "Perez");

        assert_eq!(dashboard.recent_payments.len(), 10);
        assert_eq!(dashboard.recent_payments[0].id, 12);
        assert_eq!(dashboard.stats.total_collected, Decimal::from(1200));
    }

    #[test]
    fn test_settlement_report_totals() {
        let mut store = club();
        store.coupons.push(coupon(1, 6, 2024, CouponState::Paid));
        store.payments.push(payment(1, 1, 10, 8000, "Perez"));
        store.payments.push(payment(2, 42, 11, 2000, "Gomez"));

        let report = settlement_report(&store);

        assert_eq!(report.payments[0].payment.id, 2);
        assert_eq!(report.payments[0].period, "N/A");
        assert_eq!(report.payments[0].member_name, "Unknown member");
        assert_eq!(report.payments[1].period, "6/2024");
        assert_eq!(report.payments[1].member_name, "Garcia, Juan");
        assert_eq!(report.total_collected, Decimal::from(10000));
        assert_eq!(report.total_commission, Decimal::from(500));
        assert_eq!(report.net_to_remit, Decimal::from(9500));
    }

    #[test]
    fn test_dashboard_stats() {
        let mut store = club();
        store.lockers[0].state = LockerState::Occupied;
        store.lockers[0].occupant_id = Some(MEMBER);
        add_member(&mut store, 2, "Ana", "Lopez", 1);
        store.members[1].delinquent = true;

        assert_eq!(
            dashboard_stats(&store),
            DashboardStats {
                members: 2,
                activities: 3,
                occupied_lockers: 1,
                delinquent_members: 1,
            }
        );
    }

    #[test]
    fn test_member_portal() {
        let mut store = club();
        store.lockers[1].state = LockerState::Occupied;
        store.lockers[1].occupant_id = Some(MEMBER);
        store.coupons.push(coupon(1, 5, 2024, CouponState::Paid));
        let mut open = coupon(2, 6, 2024, CouponState::Unpaid);
        open.detail.add_activity(3, Decimal::from(4000));
        open.recompute_total();
        store.coupons.push(open);

        let portal = member_portal(&store, MEMBER, june_2024()).unwrap();

        assert_eq!(portal.category.map(|c| c.id), Some(1));
        assert_eq!(portal.locker.map(|l| l.id), Some(2));
        assert_eq!(portal.coupons.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(portal.enrolled_activity_ids, vec![3]);
        let enrolled: Vec<u32> = portal
            .activities
            .iter()
            .filter(|a| a.enrolled)
            .map(|a| a.activity.id)
            .collect();
        assert_eq!(enrolled, vec![3]);
        assert_eq!(portal.available_lockers.len(), 1);
        assert!(portal.has_unpaid_invoice);
    }

    #[test]
    fn test_member_portal_unknown_member() {
        let store = club();
        assert_eq!(
            member_portal(&store, 5, june_2024()).err(),
            Some(LedgerError::MemberNotFound(5))
        );
    }
}
