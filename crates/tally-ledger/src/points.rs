//! Pure point arithmetic over a ledger snapshot.
//!
//! Daily earnings look task points up in the *current* task list by id, so a
//! task that is disabled or soft-deleted still counts for the days it was
//! completed. Only an id that no longer resolves contributes nothing.

use tally_types::{BountyCompletion, CompletionLog, LocalDate, Redemption, Task, DAILY_POINTS_CAP};

/// Points earned from daily tasks on `date`, capped at [`DAILY_POINTS_CAP`].
///
/// The cap applies to the day's sum, not to individual tasks.
pub fn earned_for_date(date: LocalDate, tasks: &[Task], completions: &CompletionLog) -> u64 {
    let sum = tasks
        .iter()
        .filter(|task| completions.is_completed(date, &task.id))
        .fold(0u64, |acc, task| acc.saturating_add(task.points));
    sum.min(DAILY_POINTS_CAP)
}

/// Sum of [`earned_for_date`] over every date present in the log.
pub fn lifetime_daily_earned(tasks: &[Task], completions: &CompletionLog) -> u64 {
    completions
        .dates()
        .map(|date| earned_for_date(date, tasks, completions))
        .fold(0u64, u64::saturating_add)
}

/// Sum of all bounty awards. Not capped.
pub fn lifetime_bounty_earned(bounty_completions: &[BountyCompletion]) -> u64 {
    bounty_completions
        .iter()
        .map(|bc| bc.points)
        .fold(0u64, u64::saturating_add)
}

/// Daily plus bounty earnings.
pub fn lifetime_earned(
    tasks: &[Task],
    completions: &CompletionLog,
    bounty_completions: &[BountyCompletion],
) -> u64 {
    lifetime_daily_earned(tasks, completions).saturating_add(lifetime_bounty_earned(bounty_completions))
}

/// Sum of all redemption costs.
pub fn lifetime_spent(redemptions: &[Redemption]) -> u64 {
    redemptions
        .iter()
        .map(|r| r.cost)
        .fold(0u64, u64::saturating_add)
}

/// Lifetime earned minus lifetime spent.
///
/// Negative only when inconsistent data was imported; [`crate::redeem`]
/// never lets a redemption push it below zero.
pub fn balance(
    tasks: &[Task],
    completions: &CompletionLog,
    bounty_completions: &[BountyCompletion],
    redemptions: &[Redemption],
) -> i64 {
    let earned = lifetime_earned(tasks, completions, bounty_completions);
    let spent = lifetime_spent(redemptions);
    clamp_i64(earned) - clamp_i64(spent)
}

fn clamp_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
