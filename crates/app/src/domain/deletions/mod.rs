//! Tenant-scoped, append-only audit log of deleted users.

pub mod cursor;
pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use cursor::DeletionCursor;
pub use errors::DeletionLogError;
pub use service::{DeletionLogService, MockDeletionLogService, PgDeletionLogService};
