//! Derived point totals and the per-day history, recomputed from a snapshot.

use serde::Serialize;
use tally_types::{BountyCompletion, CompletionLog, LocalDate, Redemption, Task};
use tracing::debug;

use crate::points::{
    earned_for_date, lifetime_bounty_earned, lifetime_daily_earned, lifetime_spent,
};

/// Everything the points ledger reads, taken from the store in one go.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub tasks: Vec<Task>,
    pub completions: CompletionLog,
    pub bounty_completions: Vec<BountyCompletion>,
    pub redemptions: Vec<Redemption>,
}

/// All derived totals for a snapshot. Recomputed on every read; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PointsProjection {
    pub today_earned: u64,
    pub lifetime_daily: u64,
    pub lifetime_bounty: u64,
    pub lifetime_earned: u64,
    pub lifetime_spent: u64,
    pub balance: i64,
}

impl PointsProjection {
    pub fn from_snapshot(snapshot: &LedgerSnapshot, today: LocalDate) -> Self {
        let lifetime_daily = lifetime_daily_earned(&snapshot.tasks, &snapshot.completions);
        let lifetime_bounty = lifetime_bounty_earned(&snapshot.bounty_completions);
        let lifetime_earned = lifetime_daily.saturating_add(lifetime_bounty);
        let lifetime_spent = lifetime_spent(&snapshot.redemptions);
        let balance = to_i64(lifetime_earned) - to_i64(lifetime_spent);
        let projection = Self {
            today_earned: earned_for_date(today, &snapshot.tasks, &snapshot.completions),
            lifetime_daily,
            lifetime_bounty,
            lifetime_earned,
            lifetime_spent,
            balance,
        };
        debug!(?projection, "recomputed points projection");
        projection
    }
}

/// One row of the per-day history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DailyEntry {
    pub date: LocalDate,
    pub earned: u64,
    pub completed: usize,
}

/// Per-day earnings for every date in the log, newest first.
pub fn daily_history(tasks: &[Task], completions: &CompletionLog) -> Vec<DailyEntry> {
    completions
        .dates()
        .rev()
        .map(|date| DailyEntry {
            date,
            earned: earned_for_date(date, tasks, completions),
            completed: completions.count_on(date),
        })
        .collect()
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
