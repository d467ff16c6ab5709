//! Billing service errors.

use jiff::Timestamp;
use roster::{billing::AmountOverflow, periods::PeriodError};
use thiserror::Error;

use crate::domain::billing::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("billing period must start before it ends ({start} >= {end})")]
    InvalidPeriod { start: Timestamp, end: Timestamp },

    #[error("catalog error")]
    Catalog(#[from] CatalogError),

    #[error("metering unit name cannot be empty")]
    MissingMeteringUnit,

    #[error("billing amount out of range")]
    Overflow(#[from] AmountOverflow),

    #[error("failed to build plan periods")]
    Period(#[from] PeriodError),
}
