//! Delete User Log Records

use jiff::Timestamp;

use crate::{
    domain::{tenants::records::TenantId, users::records::UserId},
    ids::TypedId,
};

/// Delete user log entry id.
pub type EntryId = TypedId<DeleteUserLogRecord>;

/// An immutable audit entry written after a user was deleted from a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUserLogRecord {
    /// Store-assigned, monotonically increasing id.
    pub id: EntryId,

    /// Tenant the deleted user belonged to.
    pub tenant_id: TenantId,

    /// Deleted user.
    pub user_id: UserId,

    /// The user's email at the time of deletion.
    pub email: String,

    /// When the user was deleted.
    pub deleted_at: Timestamp,
}
