//! Tenants

pub mod records;

pub use records::TenantId;
