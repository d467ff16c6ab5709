//! User deletion errors.

use thiserror::Error;

use crate::domain::{
    deletions::DeletionLogError, users::directory::DirectoryError, users::records::UserId,
};

#[derive(Debug, Error)]
pub enum UserDeletionError {
    #[error("identity platform error")]
    Directory(#[from] DirectoryError),

    /// The user is gone from the identity platform but no audit entry exists for it.
    #[error("user {user_id} was deleted but the deletion was not recorded")]
    AuditNotRecorded {
        user_id: UserId,
        #[source]
        source: DeletionLogError,
    },
}
