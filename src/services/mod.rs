// Services module - Billing rules over the club store

pub mod coupon_ledger;
pub mod enrollment_ledger;
pub mod payment_processor;
pub mod reports;
pub mod resource_assignment;

pub use coupon_ledger::{Charge, ChargeOutcome, CouponLedger};
pub use enrollment_ledger::EnrollmentLedger;
pub use payment_processor::PaymentProcessor;
pub use resource_assignment::ResourceAssignment;
