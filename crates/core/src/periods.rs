//! Plan Periods
//!
//! Splits a tenant's plan history into billing periods. Each history edge marks the moment a
//! plan was applied; the span until the next edge (or the end of the current period) is cut into
//! calendar months or calendar years, depending on the plan's recurring interval.

use jiff::{Timestamp, ToSpan, Zoned, tz::TimeZone};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plans::RecurringInterval;

const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One entry of a tenant's plan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanHistoryEntry {
    /// Plan applied at this edge; `None` (or empty) when the tenant had no plan.
    pub plan_id: Option<String>,

    /// When the plan was applied.
    pub applied_at: Timestamp,
}

/// A tenant's plan history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantPlanHistory {
    /// History edges, in any order.
    pub histories: Vec<PlanHistoryEntry>,

    /// End of the tenant's current plan period, when one is scheduled.
    pub current_plan_period_end: Option<Timestamp>,
}

/// A single billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPeriod {
    /// Human-readable `start ~ end` label in the requested time zone.
    pub label: String,

    /// Plan billed during the period.
    pub plan_id: String,

    /// First instant of the period.
    pub start: Timestamp,

    /// Last instant (inclusive, to the second) of the period.
    pub end: Timestamp,
}

/// Errors produced while building plan periods.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// No recurring interval was supplied for a plan in the history.
    #[error("no recurring interval known for plan {0}")]
    UnknownPlan(String),

    /// Calendar arithmetic overflowed the supported range.
    #[error("period arithmetic failed")]
    Time(#[from] jiff::Error),
}

/// Build the billing periods for `history`, newest first.
///
/// `intervals` maps each plan id appearing in the history to its recurring interval. The last
/// edge runs until one second before `current_plan_period_end`, or until `now` when the tenant
/// has no scheduled period end.
///
/// # Errors
///
/// Returns [`PeriodError::UnknownPlan`] when a plan in the history has no interval, and
/// [`PeriodError::Time`] when calendar arithmetic overflows.
pub fn plan_periods(
    history: &TenantPlanHistory,
    intervals: &FxHashMap<String, RecurringInterval>,
    now: Timestamp,
    tz: &TimeZone,
) -> Result<Vec<PlanPeriod>, PeriodError> {
    let mut edges: Vec<&PlanHistoryEntry> = history.histories.iter().collect();

    edges.sort_by_key(|edge| edge.applied_at);

    let last_boundary = match history.current_plan_period_end {
        Some(end) => end.checked_sub(1.second())?,
        None => now,
    };

    let mut periods = Vec::new();

    for (index, edge) in edges.iter().enumerate() {
        let Some(plan_id) = edge.plan_id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };

        let end = match edges.get(index + 1) {
            Some(next) => next.applied_at.checked_sub(1.second())?,
            None => last_boundary,
        };

        let interval = intervals
            .get(plan_id)
            .copied()
            .ok_or_else(|| PeriodError::UnknownPlan(plan_id.to_string()))?;

        split_edge(plan_id, edge.applied_at, end, interval, tz, &mut periods)?;
    }

    periods.sort_by(|a, b| b.start.cmp(&a.start));

    Ok(periods)
}

fn split_edge(
    plan_id: &str,
    start: Timestamp,
    end: Timestamp,
    interval: RecurringInterval,
    tz: &TimeZone,
    periods: &mut Vec<PlanPeriod>,
) -> Result<(), PeriodError> {
    let step = match interval {
        RecurringInterval::Month => 1.month(),
        RecurringInterval::Year => 1.year(),
    };

    let mut current = start.to_zoned(tz.clone());

    while current.timestamp() <= end {
        let next = current.checked_add(step)?;
        let segment_end = next.timestamp().checked_sub(1.second())?.min(end);

        periods.push(PlanPeriod {
            label: label(&current, &segment_end.to_zoned(tz.clone())),
            plan_id: plan_id.to_string(),
            start: current.timestamp(),
            end: segment_end,
        });

        if segment_end >= end {
            break;
        }

        current = segment_end.checked_add(1.second())?.to_zoned(tz.clone());
    }

    Ok(())
}

fn label(start: &Zoned, end: &Zoned) -> String {
    format!(
        "{} ~ {}",
        start.strftime(LABEL_FORMAT),
        end.strftime(LABEL_FORMAT)
    )
}
