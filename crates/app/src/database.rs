//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query, query_as};
use thiserror::Error;

use crate::domain::tenants::records::TenantId;

/// SQL used to set tenant context for row-level security.
///
/// The setting is transaction-local, so it is discarded on commit or rollback and never
/// survives into the next checkout of a pooled connection.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant_id', $1, true)";

const CURRENT_ROLE_FLAGS_SQL: &str =
    "SELECT rolname::text, rolsuper, rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Error)]
pub enum RoleCheckError {
    #[error("failed to inspect current database role")]
    Sql(#[from] sqlx::Error),

    #[error("role `{0}` is a superuser and bypasses row-level security")]
    Superuser(String),

    #[error("role `{0}` has BYPASSRLS")]
    BypassesRls(String),
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction and set tenant context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: &TenantId,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.as_str())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Refuse to run as a role that row-level security does not apply to.
///
/// # Errors
///
/// Returns an error when the role cannot be inspected, is a superuser, or has `BYPASSRLS`.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), RoleCheckError> {
    let (role, superuser, bypasses_rls): (String, bool, bool) =
        query_as(CURRENT_ROLE_FLAGS_SQL).fetch_one(pool).await?;

    if superuser {
        return Err(RoleCheckError::Superuser(role));
    }

    if bypasses_rls {
        return Err(RoleCheckError::BypassesRls(role));
    }

    Ok(())
}
