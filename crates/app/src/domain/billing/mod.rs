//! Billing dashboards and plan periods for tenants.

pub mod catalog;
pub mod errors;
pub mod service;

pub use catalog::{
    CatalogError, MeteringCount, MeteringSource, MockMeteringSource, MockPricingCatalog,
    PricingCatalog, UpdateMethod,
};
pub use errors::BillingError;
pub use service::*;
