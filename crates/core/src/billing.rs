//! Billing Statements
//!
//! Prices every unit of a plan for one billing period. Metering counts are requested through a
//! caller-supplied lookup so that the source of the counts (a metering API, a fixture, a cache)
//! stays outside of the calculation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plans::{AggregateUsage, PricingPlan};

/// An amount or a currency total no longer fits in a [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("amount for metering unit {metering_unit_name} overflows")]
pub struct AmountOverflow {
    /// Unit whose amount, or whose addition to its currency total, overflowed.
    pub metering_unit_name: String,
}

/// Billing line for a single pricing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringUnitBilling {
    /// Metering unit name.
    pub metering_unit_name: String,

    /// Display name of the menu the unit belongs to.
    pub function_menu_name: String,

    /// Aggregated count for the period.
    pub period_count: u64,

    /// Currency the amount is expressed in.
    pub currency: String,

    /// Amount charged for the period.
    pub period_amount: Decimal,

    /// Display name of the pricing unit.
    pub pricing_unit_display_name: String,
}

/// Total amount charged in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotal {
    /// Currency code.
    pub currency: String,

    /// Sum of every line in this currency.
    pub total_amount: Decimal,
}

/// Billing lines and per-currency totals for a plan over one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingStatement {
    /// One line per pricing unit, in plan order.
    pub billings: Vec<MeteringUnitBilling>,

    /// Totals per currency, sorted by currency code.
    pub totals: Vec<CurrencyTotal>,
}

impl BillingStatement {
    /// Number of billed metering units.
    #[must_use]
    pub fn total_metering_units(&self) -> usize {
        self.billings.len()
    }
}

/// Price every unit of `plan`.
///
/// `usage_counts` is called with a metering unit name and returns the raw counts recorded for
/// the period. Summed counts are remembered per unit name so that a unit appearing in several
/// menus is only looked up once; a fixed unit reports the remembered count for its name, or zero.
///
/// # Errors
///
/// Returns the first error produced by `usage_counts`, or [`AmountOverflow`] converted into `E`
/// when an amount or a total exceeds the range of [`Decimal`].
pub fn calculate_billings<F, E>(
    plan: &PricingPlan,
    mut usage_counts: F,
) -> Result<BillingStatement, E>
where
    F: FnMut(&str) -> Result<Vec<u64>, E>,
    E: From<AmountOverflow>,
{
    let mut billings = Vec::new();
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut summed: FxHashMap<String, u64> = FxHashMap::default();

    for (menu, unit) in plan.units() {
        let mut count = summed
            .get(&unit.metering_unit_name)
            .copied()
            .unwrap_or_default();

        if !unit.pricing.is_fixed() && count == 0 {
            let counts = usage_counts(&unit.metering_unit_name)?;

            count = unit.aggregate_usage.aggregate(&counts);

            if unit.aggregate_usage == AggregateUsage::Sum {
                summed.insert(unit.metering_unit_name.clone(), count);
            }
        }

        let overflow = || AmountOverflow {
            metering_unit_name: unit.metering_unit_name.clone(),
        };

        let amount = unit.pricing.amount(count).ok_or_else(overflow)?;

        let total = totals.entry(unit.currency.clone()).or_default();

        *total = total.checked_add(amount).ok_or_else(overflow)?;

        billings.push(MeteringUnitBilling {
            metering_unit_name: unit.metering_unit_name.clone(),
            function_menu_name: menu.display_name.clone(),
            period_count: count,
            currency: unit.currency.clone(),
            period_amount: amount,
            pricing_unit_display_name: unit.display_name.clone(),
        });
    }

    Ok(BillingStatement {
        billings,
        totals: totals
            .into_iter()
            .map(|(currency, total_amount)| CurrencyTotal {
                currency,
                total_amount,
            })
            .collect(),
    })
}
