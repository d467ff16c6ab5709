//! Delete user log errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// SQLSTATE raised when a row fails a row-level security `WITH CHECK` clause.
const INSUFFICIENT_PRIVILEGE: &str = "42501";

#[derive(Debug, Error)]
pub enum DeletionLogError {
    #[error("missing required field `{0}`")]
    ConstraintViolation(&'static str),

    #[error("tenant is outside the session's tenant context")]
    AccessDenied,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for DeletionLogError {
    fn from(error: Error) -> Self {
        if let Some(classified) = error.as_database_error().and_then(|db| classify(db)) {
            return classified;
        }

        Self::Sql(error)
    }
}

fn classify(error: &dyn DatabaseError) -> Option<DeletionLogError> {
    if error.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) {
        return Some(DeletionLogError::AccessDenied);
    }

    match error.kind() {
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation => Some(
            DeletionLogError::ConstraintViolation(constrained_field(error.constraint())),
        ),
        _ => None,
    }
}

fn constrained_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("delete_user_log_tenant_id_present") => "tenant_id",
        Some("delete_user_log_user_id_present") => "user_id",
        Some("delete_user_log_email_present") => "email",
        _ => "unknown",
    }
}
