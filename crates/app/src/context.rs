//! App Context

use std::sync::Arc;

use jiff::tz::TimeZone;
use thiserror::Error;

use crate::{
    database::{self, Db, RoleCheckError},
    domain::{
        billing::{CatalogBillingService, MeteringSource, PricingCatalog},
        deletions::{DeletionLogService, PgDeletionLogService},
        users::{DirectoryUserDeletionService, UserDirectory},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role is unsafe for row-level security")]
    UnsafeRole(#[source] RoleCheckError),
}

#[derive(Clone)]
pub struct AppContext {
    pub deletions: Arc<dyn DeletionLogService>,

    /// Time zone billing periods are counted and labelled in. UTC unless overridden.
    pub billing_time_zone: TimeZone,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or when the connected
    /// role would bypass row-level security.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::UnsafeRole)?;

        Ok(Self {
            deletions: Arc::new(PgDeletionLogService::new(Db::new(pool))),
            billing_time_zone: TimeZone::UTC,
        })
    }

    #[must_use]
    pub fn with_billing_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.billing_time_zone = time_zone;
        self
    }

    /// Billing over `catalog` and `metering`, in this context's billing time zone.
    #[must_use]
    pub fn billing(
        &self,
        catalog: Arc<dyn PricingCatalog>,
        metering: Arc<dyn MeteringSource>,
    ) -> CatalogBillingService {
        CatalogBillingService::new(catalog, metering, self.billing_time_zone.clone())
    }

    /// User deletion backed by `directory`, audited in this context's log.
    #[must_use]
    pub fn user_deletions(&self, directory: Arc<dyn UserDirectory>) -> DirectoryUserDeletionService {
        DirectoryUserDeletionService::new(directory, Arc::clone(&self.deletions))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use roster::{
        periods::{PlanHistoryEntry, TenantPlanHistory},
        plans::PricingPlan,
    };
    use testresult::TestResult;

    use crate::{
        domain::{
            billing::{BillingService, MockMeteringSource, MockPricingCatalog},
            deletions::MockDeletionLogService,
            users::{MockUserDirectory, UserDeletionService, records::TenantUser},
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn superuser_url_is_refused() {
        let ctx = TestContext::new().await;

        let result = AppContext::from_database_url(&ctx.db.superuser_url).await;

        assert!(
            matches!(
                result,
                Err(AppInitError::UnsafeRole(RoleCheckError::Superuser(_)))
            ),
            "expected UnsafeRole(Superuser)"
        );
    }

    #[tokio::test]
    async fn unreachable_database_is_a_connection_error() {
        let result = AppContext::from_database_url("postgres://nobody@127.0.0.1:1/none").await;

        assert!(matches!(result, Err(AppInitError::Database(_))));
    }

    #[tokio::test]
    async fn user_deletions_are_audited_in_the_context_log() -> TestResult {
        let ctx = TestContext::new().await;
        let tenant = ctx.tenant_id.clone();

        let app = AppContext {
            deletions: Arc::new(ctx.deletions.clone()),
            billing_time_zone: TimeZone::UTC,
        };

        let mut directory = MockUserDirectory::new();

        directory.expect_get_tenant_user().returning(|tenant, user| {
            Ok(TenantUser {
                id: user.clone(),
                tenant_id: tenant.clone(),
                email: "gone@example.com".to_string(),
            })
        });

        directory.expect_delete_tenant_user().returning(|_, _| Ok(()));

        app.user_deletions(Arc::new(directory))
            .delete_user(&tenant, &"u9".into())
            .await?;

        let entries = app.deletions.list_deletions(&tenant, &tenant).await?;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].email, "gone@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn billing_counts_periods_in_the_context_time_zone() -> TestResult {
        let tokyo = TimeZone::fixed(jiff::tz::offset(9));

        let app = AppContext {
            deletions: Arc::new(MockDeletionLogService::new()),
            billing_time_zone: TimeZone::UTC,
        }
        .with_billing_time_zone(tokyo);

        let applied_at: Timestamp = "2024-01-31T15:00:00Z".parse()?;

        let mut catalog = MockPricingCatalog::new();

        catalog.expect_get_tenant_plan_history().returning(move |_| {
            Ok(TenantPlanHistory {
                histories: vec![PlanHistoryEntry {
                    plan_id: Some("monthly".to_string()),
                    applied_at,
                }],
                current_plan_period_end: None,
            })
        });

        catalog.expect_get_pricing_plan().returning(|id| {
            Ok(PricingPlan {
                id: id.to_string(),
                display_name: id.to_string(),
                description: String::new(),
                menus: Vec::new(),
            })
        });

        let periods = app
            .billing(Arc::new(catalog), Arc::new(MockMeteringSource::new()))
            .plan_periods(&"tenant-1".into(), "2024-02-10T00:00:00Z".parse()?)
            .await?;

        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start, applied_at);
        assert!(periods[0].label.starts_with("2024-02-01 00:00:00 ~ "));

        Ok(())
    }
}
