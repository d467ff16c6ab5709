//! Billing service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use roster::{
    billing::{BillingStatement, calculate_billings},
    periods::{self, PlanPeriod},
    plans::RecurringInterval,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{Span, info};

use crate::domain::{
    billing::{
        catalog::{MeteringCount, MeteringSource, PricingCatalog, UpdateMethod},
        errors::BillingError,
    },
    tenants::records::TenantId,
};

/// Closed interval a dashboard is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanInfo {
    pub plan_id: String,
    pub display_name: String,
    pub description: String,
}

/// A plan's billing statement for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingDashboard {
    pub statement: BillingStatement,
    pub plan: PlanInfo,
}

#[derive(Clone)]
pub struct CatalogBillingService {
    catalog: Arc<dyn PricingCatalog>,
    metering: Arc<dyn MeteringSource>,
    time_zone: TimeZone,
}

impl CatalogBillingService {
    /// Period labels are rendered in `time_zone`, and months and years are counted in it.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn PricingCatalog>,
        metering: Arc<dyn MeteringSource>,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            catalog,
            metering,
            time_zone,
        }
    }
}

#[async_trait]
impl BillingService for CatalogBillingService {
    #[tracing::instrument(
        name = "billing.service.dashboard",
        skip(self, tenant),
        fields(tenant_id = %tenant, metered_unit_count = tracing::field::Empty),
        err
    )]
    async fn dashboard(
        &self,
        tenant: &TenantId,
        plan_id: &str,
        period: BillingPeriod,
    ) -> Result<BillingDashboard, BillingError> {
        if period.start >= period.end {
            return Err(BillingError::InvalidPeriod {
                start: period.start,
                end: period.end,
            });
        }

        let plan = self.catalog.get_pricing_plan(plan_id).await?;

        // Unknown tenants surface as a catalog error before any metering lookup.
        self.catalog.get_tenant_plan_history(tenant).await?;

        let mut counts: FxHashMap<&str, Vec<u64>> = FxHashMap::default();

        for (_, unit) in plan.units().filter(|(_, unit)| !unit.pricing.is_fixed()) {
            let name = unit.metering_unit_name.as_str();

            if counts.contains_key(name) {
                continue;
            }

            let unit_counts = self
                .metering
                .unit_date_counts(tenant, name, period.start, period.end)
                .await?;

            counts.insert(name, unit_counts);
        }

        Span::current().record("metered_unit_count", counts.len());

        let statement = calculate_billings(&plan, |name| {
            Ok::<_, BillingError>(counts.get(name).cloned().unwrap_or_default())
        })?;

        Ok(BillingDashboard {
            statement,
            plan: PlanInfo {
                plan_id: plan.id.clone(),
                display_name: plan.display_name.clone(),
                description: plan.description.clone(),
            },
        })
    }

    #[tracing::instrument(
        name = "billing.service.plan_periods",
        skip(self, tenant),
        fields(tenant_id = %tenant, period_count = tracing::field::Empty),
        err
    )]
    async fn plan_periods(
        &self,
        tenant: &TenantId,
        now: Timestamp,
    ) -> Result<Vec<PlanPeriod>, BillingError> {
        let history = self.catalog.get_tenant_plan_history(tenant).await?;

        let mut intervals: FxHashMap<String, RecurringInterval> = FxHashMap::default();

        for plan_id in history
            .histories
            .iter()
            .filter_map(|edge| edge.plan_id.as_deref())
            .filter(|plan_id| !plan_id.is_empty())
        {
            if intervals.contains_key(plan_id) {
                continue;
            }

            let plan = self.catalog.get_pricing_plan(plan_id).await?;

            intervals.insert(plan_id.to_string(), plan.recurring_interval());
        }

        let periods = periods::plan_periods(&history, &intervals, now, &self.time_zone)?;

        Span::current().record("period_count", periods.len());

        Ok(periods)
    }

    #[tracing::instrument(
        name = "billing.service.update_metering_count",
        skip(self, tenant),
        fields(tenant_id = %tenant, method = method.as_str()),
        err
    )]
    async fn update_metering_count(
        &self,
        tenant: &TenantId,
        unit: &str,
        timestamp: Timestamp,
        method: UpdateMethod,
        count: u64,
    ) -> Result<MeteringCount, BillingError> {
        if unit.trim().is_empty() {
            return Err(BillingError::MissingMeteringUnit);
        }

        let updated = self
            .metering
            .update_timestamp_count(tenant, unit, timestamp, method, count)
            .await?;

        info!(count = updated.count, "metering count updated");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait BillingService: Send + Sync {
    /// Price `plan_id` for `tenant` over `period`.
    async fn dashboard(
        &self,
        tenant: &TenantId,
        plan_id: &str,
        period: BillingPeriod,
    ) -> Result<BillingDashboard, BillingError>;

    /// Billing periods of `tenant`'s plan history, newest first.
    async fn plan_periods(
        &self,
        tenant: &TenantId,
        now: Timestamp,
    ) -> Result<Vec<PlanPeriod>, BillingError>;

    /// Apply `count` to `unit`'s stored count at `timestamp` for `tenant`.
    async fn update_metering_count(
        &self,
        tenant: &TenantId,
        unit: &str,
        timestamp: Timestamp,
        method: UpdateMethod,
        count: u64,
    ) -> Result<MeteringCount, BillingError>;
}
