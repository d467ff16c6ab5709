//! Delete User Log Data

use jiff::Timestamp;

use crate::domain::{
    deletions::errors::DeletionLogError, tenants::records::TenantId, users::records::UserId,
};

/// New Deletion Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeletion {
    /// Tenant the deleted user belonged to.
    pub tenant_id: TenantId,

    /// Deleted user.
    pub user_id: UserId,

    /// The user's email at the time of deletion.
    pub email: String,

    /// Deletion time; the time of insertion when omitted.
    pub deleted_at: Option<Timestamp>,
}

impl NewDeletion {
    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`DeletionLogError::ConstraintViolation`] naming the first blank field.
    pub fn validate(&self) -> Result<(), DeletionLogError> {
        if self.tenant_id.is_blank() {
            return Err(DeletionLogError::ConstraintViolation("tenant_id"));
        }

        if self.user_id.is_blank() {
            return Err(DeletionLogError::ConstraintViolation("user_id"));
        }

        if self.email.trim().is_empty() {
            return Err(DeletionLogError::ConstraintViolation("email"));
        }

        Ok(())
    }
}
