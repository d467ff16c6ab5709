//! Tenant users and their deletion.

pub mod directory;
pub mod errors;
pub mod records;
pub mod service;

pub use directory::{DirectoryError, MockUserDirectory, UserDirectory};
pub use errors::UserDeletionError;
pub use service::{DirectoryUserDeletionService, MockUserDeletionService, UserDeletionService};
