//! Roster
//!
//! Billing calculations for tenants of a multi-tenant SaaS: turning metering counts into
//! amounts under a pricing plan, and splitting a tenant's plan history into billing periods.

pub mod billing;
pub mod periods;
pub mod plans;
pub mod pricing;
