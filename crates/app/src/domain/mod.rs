//! Roster Domain Concerns

pub mod billing;
pub mod deletions;
pub mod tenants;
pub mod users;
