//! Test Helpers

use uuid::Uuid;

use crate::domain::{deletions::data::NewDeletion, tenants::records::TenantId};

/// A tenant id no other test uses.
pub(crate) fn unique_tenant_id() -> TenantId {
    TenantId::new(format!("tenant-{}", Uuid::now_v7()))
}

pub(crate) fn new_deletion(tenant: &TenantId, user_id: &str, email: &str) -> NewDeletion {
    NewDeletion {
        tenant_id: tenant.clone(),
        user_id: user_id.into(),
        email: email.to_string(),
        deleted_at: None,
    }
}
