//! Guarded ledger mutations.
//!
//! Each operation checks its preconditions first and only then produces the
//! history record (or mutates the entity). A refusal leaves every input
//! untouched.

use tally_types::{
    BountyCompletion, BountyTask, CompletionLog, EntityId, Lifecycle, LocalDate, Redemption, Reward,
    Timestamp,
};
use tracing::{debug, warn};

use crate::error::LedgerError;

/// Flip `task_id` on `date`. Returns whether the task is now completed.
pub fn toggle_completion(completions: &mut CompletionLog, date: LocalDate, task_id: &EntityId) -> bool {
    let completed = completions.toggle(date, task_id);
    debug!(%date, task = %task_id, completed, "toggled completion");
    completed
}

/// Redeem `reward` against the current `balance`.
///
/// Refuses inactive rewards and any cost above the balance; there is no
/// partial redemption.
pub fn redeem(reward: &Reward, balance: i64, now: Timestamp) -> Result<Redemption, LedgerError> {
    if !reward.lifecycle.is_active() {
        return Err(LedgerError::RewardUnavailable(reward.name.clone()));
    }
    if i64::try_from(reward.cost).map_or(true, |cost| cost > balance) {
        warn!(reward = %reward.id, balance, cost = reward.cost, "redemption refused");
        return Err(LedgerError::InsufficientBalance {
            balance,
            cost: reward.cost,
        });
    }
    Ok(Redemption::of(reward, now))
}

/// Complete an open bounty on `today`.
///
/// On success the bounty is retired (`Disabled`, `completed_at` set) and the
/// frozen award record is returned. An expired bounty stays active so the
/// user can disable or delete it explicitly.
pub fn complete_bounty(
    bounty: &mut BountyTask,
    today: LocalDate,
    now: Timestamp,
) -> Result<BountyCompletion, LedgerError> {
    if !bounty.lifecycle.is_active() || bounty.is_completed() {
        return Err(LedgerError::BountyUnavailable(bounty.title.clone()));
    }
    if bounty.is_expired(today) {
        warn!(bounty = %bounty.id, deadline = %bounty.deadline, %today, "bounty expired");
        return Err(LedgerError::ExpiredBounty {
            title: bounty.title.clone(),
            deadline: bounty.deadline,
            today,
        });
    }
    let record = BountyCompletion::of(bounty, now);
    bounty.lifecycle = Lifecycle::Disabled;
    bounty.completed_at = Some(now);
    Ok(record)
}
