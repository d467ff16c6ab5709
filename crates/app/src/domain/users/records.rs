//! Tenant User Records

use crate::{domain::tenants::records::TenantId, ids::TypedKey};

/// User identifier as issued by the identity platform.
pub type UserId = TypedKey<TenantUser>;

/// A user of a tenant, as reported by the identity platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantUser {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub email: String,
}
