//! Tenant Records

use crate::ids::TypedKey;

/// Tenant marker; tenants are owned by the external identity platform.
#[derive(Debug, Clone, Copy)]
pub struct Tenant;

/// Tenant identifier as issued by the identity platform.
pub type TenantId = TypedKey<Tenant>;
