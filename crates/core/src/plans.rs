//! Pricing Plans

use serde::{Deserialize, Serialize};

use crate::pricing::UnitKind;

/// How the metering counts of a billing period are collapsed into a single count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateUsage {
    /// Add every count in the period.
    #[default]
    Sum,

    /// Take the largest count in the period.
    Max,
}

impl AggregateUsage {
    /// Collapse `counts` into a single count.
    #[must_use]
    pub fn aggregate(self, counts: &[u64]) -> u64 {
        match self {
            Self::Sum => counts.iter().fold(0, |total, count| total.saturating_add(*count)),
            Self::Max => counts.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Billing cadence of a recurring pricing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringInterval {
    /// Billed every calendar month.
    Month,

    /// Billed every calendar year.
    Year,
}

/// A metered pricing unit within a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingUnit {
    /// Metering unit name used to look up counts.
    pub metering_unit_name: String,

    /// Human-readable unit name.
    pub display_name: String,

    /// ISO currency code the unit is priced in.
    pub currency: String,

    /// How counts are converted into an amount.
    pub pricing: UnitKind,

    /// How the counts of a period are aggregated.
    #[serde(default)]
    pub aggregate_usage: AggregateUsage,

    /// Billing cadence, when the unit recurs.
    #[serde(default)]
    pub recurring_interval: Option<RecurringInterval>,
}

/// A named group of pricing units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingMenu {
    /// Human-readable menu name.
    pub display_name: String,

    /// Units priced by this menu.
    pub units: Vec<PricingUnit>,
}

/// A pricing plan a tenant can be subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    /// Plan identifier.
    pub id: String,

    /// Human-readable plan name.
    pub display_name: String,

    /// Plan description.
    #[serde(default)]
    pub description: String,

    /// Menus making up the plan.
    pub menus: Vec<PricingMenu>,
}

impl PricingPlan {
    /// Iterate over every unit of every menu, paired with its menu.
    pub fn units(&self) -> impl Iterator<Item = (&PricingMenu, &PricingUnit)> {
        self.menus
            .iter()
            .flat_map(|menu| menu.units.iter().map(move |unit| (menu, unit)))
    }

    /// Billing cadence of the plan: yearly when any unit recurs yearly, monthly otherwise.
    #[must_use]
    pub fn recurring_interval(&self) -> RecurringInterval {
        if self
            .units()
            .any(|(_, unit)| unit.recurring_interval == Some(RecurringInterval::Year))
        {
            RecurringInterval::Year
        } else {
            RecurringInterval::Month
        }
    }
}
