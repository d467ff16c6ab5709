//! Test support: a shared PostgreSQL container and per-test databases.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
