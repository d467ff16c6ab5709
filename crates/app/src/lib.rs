//! Tenant-scoped audit log of deleted users, plus billing over tenant plan histories.

pub mod context;
pub mod database;
pub mod domain;
pub mod ids;

#[cfg(test)]
mod test;
