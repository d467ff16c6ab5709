//! Pricing and metering seams.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use roster::{periods::TenantPlanHistory, plans::PricingPlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::tenants::records::TenantId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("pricing catalog unavailable: {0}")]
    Unavailable(String),
}

/// How a metering count update combines with the stored count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMethod {
    /// Add to the stored count.
    Add,

    /// Subtract from the stored count.
    Sub,

    /// Replace the stored count.
    Direct,
}

impl UpdateMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Direct => "direct",
        }
    }
}

/// Stored count of a metering unit at one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeteringCount {
    pub timestamp: Timestamp,
    pub count: u64,
}

#[automock]
#[async_trait]
/// Pricing plans and the plans applied to each tenant.
pub trait PricingCatalog: Send + Sync {
    async fn get_pricing_plan(&self, plan_id: &str) -> Result<PricingPlan, CatalogError>;

    async fn get_tenant_plan_history(
        &self,
        tenant: &TenantId,
    ) -> Result<TenantPlanHistory, CatalogError>;
}

#[automock]
#[async_trait]
/// Recorded usage of metering units.
pub trait MeteringSource: Send + Sync {
    /// Daily counts of `unit` for `tenant` between `start` and `end`.
    async fn unit_date_counts(
        &self,
        tenant: &TenantId,
        unit: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<u64>, CatalogError>;

    /// Apply `count` to the stored count of `unit` at `timestamp` using `method`.
    async fn update_timestamp_count(
        &self,
        tenant: &TenantId,
        unit: &str,
        timestamp: Timestamp,
        method: UpdateMethod,
        count: u64,
    ) -> Result<MeteringCount, CatalogError>;
}
