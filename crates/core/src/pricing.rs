//! Pricing Units
//!
//! A pricing unit converts the metered count for a billing period into an amount. Fixed units
//! ignore the count, usage units multiply it, and the two tiered kinds either pick a single
//! tier for the whole count or charge each tier for the slice of the count that falls inside it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound of a pricing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpTo {
    /// The tier covers counts up to and including this value.
    Bounded(u64),

    /// The tier has no upper bound.
    Infinite,
}

/// A single tier of a tiered pricing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Upper bound of the tier.
    pub up_to: UpTo,

    /// Flat amount charged whenever the tier applies.
    pub flat_amount: Decimal,

    /// Amount charged per counted unit within the tier.
    pub unit_amount: Decimal,
}

impl Tier {
    /// Create a tier bounded at `up_to`.
    #[must_use]
    pub const fn bounded(up_to: u64, flat_amount: Decimal, unit_amount: Decimal) -> Self {
        Self {
            up_to: UpTo::Bounded(up_to),
            flat_amount,
            unit_amount,
        }
    }

    /// Create an unbounded tier.
    #[must_use]
    pub const fn infinite(flat_amount: Decimal, unit_amount: Decimal) -> Self {
        Self {
            up_to: UpTo::Infinite,
            flat_amount,
            unit_amount,
        }
    }

    const fn covers(&self, count: u64) -> bool {
        match self.up_to {
            UpTo::Bounded(limit) => count <= limit,
            UpTo::Infinite => true,
        }
    }

    fn charge(&self, count: u64) -> Option<Decimal> {
        Decimal::from(count)
            .checked_mul(self.unit_amount)?
            .checked_add(self.flat_amount)
    }
}

/// How a pricing unit turns a count into an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnitKind {
    /// A fixed charge, independent of usage.
    Fixed {
        /// Amount charged per period.
        unit_amount: Decimal,
    },

    /// A linear per-unit charge.
    Usage {
        /// Amount charged per counted unit.
        unit_amount: Decimal,
    },

    /// The first tier covering the whole count prices all of it.
    Tiered {
        /// Tiers in ascending order of their bounds.
        tiers: Vec<Tier>,
    },

    /// Each tier prices the slice of the count that falls inside it.
    TieredUsage {
        /// Tiers in ascending order of their bounds.
        tiers: Vec<Tier>,
    },
}

impl UnitKind {
    /// Return the amount charged for `count` metered units, or `None` when the amount does not
    /// fit in a [`Decimal`].
    #[must_use]
    pub fn amount(&self, count: u64) -> Option<Decimal> {
        match self {
            Self::Fixed { unit_amount } => Some(*unit_amount),
            Self::Usage { unit_amount } => Decimal::from(count).checked_mul(*unit_amount),
            Self::Tiered { tiers } => tiered_amount(tiers, count),
            Self::TieredUsage { tiers } => graduated_amount(tiers, count),
        }
    }

    /// Whether this unit ignores metering counts.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Return the unit kind as a string.
    #[must_use]
    pub const fn type_as_str(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Usage { .. } => "usage",
            Self::Tiered { .. } => "tiered",
            Self::TieredUsage { .. } => "tiered_usage",
        }
    }
}

/// Price the whole count with the first covering tier, falling back to the last tier when the
/// count exceeds every bound.
fn tiered_amount(tiers: &[Tier], count: u64) -> Option<Decimal> {
    tiers
        .iter()
        .find(|tier| tier.covers(count))
        .or_else(|| tiers.last())
        .map_or(Some(Decimal::ZERO), |tier| tier.charge(count))
}

fn graduated_amount(tiers: &[Tier], count: u64) -> Option<Decimal> {
    let mut total = Decimal::ZERO;
    let mut previous = 0_u64;

    for tier in tiers {
        if count <= previous {
            break;
        }

        match tier.up_to {
            UpTo::Bounded(limit) => {
                total = total.checked_add(tier.charge(count.min(limit).saturating_sub(previous))?)?;
                previous = limit;
            }
            UpTo::Infinite => {
                total = total.checked_add(tier.charge(count - previous)?)?;
                break;
            }
        }
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graduated() -> UnitKind {
        UnitKind::TieredUsage {
            tiers: vec![
                Tier::bounded(10, Decimal::ZERO, Decimal::ONE),
                Tier::bounded(20, Decimal::ZERO, Decimal::TWO),
                Tier::infinite(Decimal::ONE, Decimal::from(3)),
            ],
        }
    }

    #[test]
    fn fixed_ignores_count() {
        let kind = UnitKind::Fixed {
            unit_amount: Decimal::from(980),
        };

        assert_eq!(kind.amount(0), Some(Decimal::from(980)));
        assert_eq!(kind.amount(1_000), Some(Decimal::from(980)));
        assert!(kind.is_fixed());
    }

    #[test]
    fn usage_multiplies_count() {
        let kind = UnitKind::Usage {
            unit_amount: Decimal::new(15, 1),
        };

        assert_eq!(kind.amount(4), Some(Decimal::from(6)));
        assert_eq!(kind.amount(0), Some(Decimal::ZERO));
    }

    #[test]
    fn tiered_prices_whole_count_with_covering_tier() {
        let kind = UnitKind::Tiered {
            tiers: vec![
                Tier::bounded(10, Decimal::ZERO, Decimal::ONE),
                Tier::infinite(Decimal::from(5), Decimal::new(5, 1)),
            ],
        };

        assert_eq!(kind.amount(5), Some(Decimal::from(5)));
        assert_eq!(kind.amount(10), Some(Decimal::from(10)));
        assert_eq!(kind.amount(20), Some(Decimal::from(15)));
    }

    #[test]
    fn tiered_falls_back_to_last_tier_beyond_every_bound() {
        let kind = UnitKind::Tiered {
            tiers: vec![
                Tier::bounded(5, Decimal::ZERO, Decimal::ONE),
                Tier::bounded(10, Decimal::ONE, Decimal::TWO),
            ],
        };

        assert_eq!(kind.amount(15), Some(Decimal::from(31)));
    }

    #[test]
    fn tiered_without_tiers_is_free() {
        let kind = UnitKind::Tiered { tiers: Vec::new() };

        assert_eq!(kind.amount(42), Some(Decimal::ZERO));
    }

    #[test]
    fn graduated_charges_each_tier_for_its_slice() {
        // 10 * 1 + 10 * 2 + (1 + 5 * 3)
        assert_eq!(graduated().amount(25), Some(Decimal::from(46)));
    }

    #[test]
    fn graduated_stops_once_count_is_exhausted() {
        assert_eq!(graduated().amount(5), Some(Decimal::from(5)));
        assert_eq!(graduated().amount(10), Some(Decimal::from(10)));
        assert_eq!(graduated().amount(0), Some(Decimal::ZERO));
    }

    #[test]
    fn overflowing_amounts_are_reported() {
        let usage = UnitKind::Usage {
            unit_amount: Decimal::from(10_000_000_000_u64),
        };

        assert_eq!(usage.amount(u64::MAX), None);

        let tiered = UnitKind::Tiered {
            tiers: vec![Tier::infinite(Decimal::MAX, Decimal::ZERO)],
        };

        assert_eq!(tiered.amount(1), Some(Decimal::MAX));

        let graduated = UnitKind::TieredUsage {
            tiers: vec![
                Tier::bounded(1, Decimal::MAX, Decimal::ZERO),
                Tier::infinite(Decimal::MAX, Decimal::ZERO),
            ],
        };

        assert_eq!(graduated.amount(2), None);
    }

    #[test]
    fn type_as_str_names_each_kind() {
        assert_eq!(graduated().type_as_str(), "tiered_usage");
        assert_eq!(UnitKind::Tiered { tiers: Vec::new() }.type_as_str(), "tiered");
    }
}
