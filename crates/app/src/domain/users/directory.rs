//! Identity platform seam.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::{
    tenants::records::TenantId,
    users::records::{TenantUser, UserId},
};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user not found")]
    NotFound,

    #[error("identity platform rejected the request: {0}")]
    Rejected(String),

    #[error("identity platform unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
/// User management on the external identity platform.
pub trait UserDirectory: Send + Sync {
    /// Every user registered in `tenant`.
    async fn list_tenant_users(&self, tenant: &TenantId) -> Result<Vec<TenantUser>, DirectoryError>;

    /// Look up a user of `tenant`.
    async fn get_tenant_user(
        &self,
        tenant: &TenantId,
        user: &UserId,
    ) -> Result<TenantUser, DirectoryError>;

    /// Remove a user from `tenant`.
    async fn delete_tenant_user(
        &self,
        tenant: &TenantId,
        user: &UserId,
    ) -> Result<(), DirectoryError>;
}
