use std::path::Path;

use tally_backup::{AppInfo, BackupMeta};
use tally_ledger::{DailyEntry, LedgerSnapshot, PointsProjection};
use tally_levels::{Direction, Standing, TierAdvice, TierPatch};
use tally_store::decode::encode;
use tally_store::{BatchOp, FileKvStore, InMemoryKvStore, KvStore, KvStoreExt, StateKey};
use tally_types::validation::{parse_deadline, parse_points, parse_title};
use tally_types::{
    BountyCompletion, BountyTask, CompletionLog, EntityId, LevelTier, Lifecycle, LocalDate,
    Redemption, Reward, Task, Timestamp, ValidationError,
};
use tracing::info;

use crate::error::{SdkError, SdkResult};
use crate::seed;

/// High-level tally API over a [`KvStore`].
///
/// Every read goes to the store and every derived number is recomputed, so
/// two facades over the same store never disagree for longer than one call.
pub struct Tally<S> {
    store: S,
}

impl Tally<InMemoryKvStore> {
    /// Facade over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryKvStore::new())
    }
}

impl Tally<FileKvStore> {
    /// Facade over the data file at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> SdkResult<Self> {
        Ok(Self::new(FileKvStore::open(path)?))
    }
}

impl<S: KvStore> Tally<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- Collections ----

    pub fn tasks(&self) -> Vec<Task> {
        self.store.load_list(StateKey::Tasks)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> SdkResult<()> {
        Ok(self.store.save(StateKey::Tasks, tasks)?)
    }

    pub fn rewards(&self) -> Vec<Reward> {
        self.store.load_list(StateKey::Rewards)
    }

    pub fn save_rewards(&self, rewards: &[Reward]) -> SdkResult<()> {
        Ok(self.store.save(StateKey::Rewards, rewards)?)
    }

    pub fn completions(&self) -> CompletionLog {
        self.store.load_completions()
    }

    pub fn save_completions(&self, completions: &CompletionLog) -> SdkResult<()> {
        Ok(self.store.save(StateKey::Completions, completions)?)
    }

    pub fn redemptions(&self) -> Vec<Redemption> {
        self.store.load_list(StateKey::Redemptions)
    }

    pub fn save_redemptions(&self, redemptions: &[Redemption]) -> SdkResult<()> {
        Ok(self.store.save(StateKey::Redemptions, redemptions)?)
    }

    pub fn bounties(&self) -> Vec<BountyTask> {
        self.store.load_list(StateKey::Bounties)
    }

    pub fn save_bounties(&self, bounties: &[BountyTask]) -> SdkResult<()> {
        Ok(self.store.save(StateKey::Bounties, bounties)?)
    }

    pub fn bounty_completions(&self) -> Vec<BountyCompletion> {
        self.store.load_list(StateKey::BountyCompletions)
    }

    pub fn save_bounty_completions(&self, records: &[BountyCompletion]) -> SdkResult<()> {
        Ok(self.store.save(StateKey::BountyCompletions, records)?)
    }

    pub fn levels(&self) -> Vec<LevelTier> {
        self.store.load_list(StateKey::Levels)
    }

    pub fn save_levels(&self, levels: &[LevelTier]) -> SdkResult<()> {
        Ok(self.store.save(StateKey::Levels, levels)?)
    }

    /// Seed tasks, rewards and levels with starter content where the stored
    /// collection is empty. Returns the keys that were written.
    pub fn ensure_defaults(&self) -> SdkResult<Vec<StateKey>> {
        let mut seeded = Vec::new();
        if self.tasks().is_empty() {
            self.save_tasks(&seed::default_tasks())?;
            seeded.push(StateKey::Tasks);
        }
        if self.rewards().is_empty() {
            self.save_rewards(&seed::default_rewards())?;
            seeded.push(StateKey::Rewards);
        }
        if self.levels().is_empty() {
            self.save_levels(&seed::default_levels())?;
            seeded.push(StateKey::Levels);
        }
        if !seeded.is_empty() {
            info!(?seeded, "seeded starter content");
        }
        Ok(seeded)
    }

    // ---- Daily tasks ----

    pub fn add_task(&self, title: &str, points: &str) -> SdkResult<Task> {
        let title = parse_title(title)?;
        let points = parse_points(points)?;
        let task = Task::new(&title, signed(points))?;
        let mut tasks = self.tasks();
        tasks.push(task.clone());
        self.save_tasks(&tasks)?;
        info!(task = %task.id, points = task.points, "added task");
        Ok(task)
    }

    /// Shelve an active task or put a shelved one back. Returns the new state.
    pub fn toggle_task(&self, id: &EntityId) -> SdkResult<Lifecycle> {
        let mut tasks = self.tasks();
        let state = toggle(&mut tasks, id)?;
        self.save_tasks(&tasks)?;
        info!(task = %id, ?state, "toggled task");
        Ok(state)
    }

    /// Soft-delete a shelved task. Its past completions keep counting.
    pub fn delete_task(&self, id: &EntityId) -> SdkResult<()> {
        let mut tasks = self.tasks();
        soft_delete(&mut tasks, id)?;
        self.save_tasks(&tasks)?;
        info!(task = %id, "deleted task");
        Ok(())
    }

    /// Flip `id` on `date`. Returns whether it is now completed.
    pub fn toggle_completion(&self, id: &EntityId, date: LocalDate) -> SdkResult<bool> {
        let mut tasks = self.tasks();
        find_visible(&mut tasks, id)?;
        let mut completions = self.completions();
        let completed = tally_ledger::toggle_completion(&mut completions, date, id);
        self.save_completions(&completions)?;
        Ok(completed)
    }

    // ---- Rewards ----

    pub fn add_reward(&self, name: &str, cost: &str, description: Option<&str>) -> SdkResult<Reward> {
        let name = parse_title(name)?;
        let cost = parse_points(cost)?;
        let reward = Reward::new(&name, signed(cost), description)?;
        let mut rewards = self.rewards();
        rewards.push(reward.clone());
        self.save_rewards(&rewards)?;
        info!(reward = %reward.id, cost = reward.cost, "added reward");
        Ok(reward)
    }

    pub fn toggle_reward(&self, id: &EntityId) -> SdkResult<Lifecycle> {
        let mut rewards = self.rewards();
        let state = toggle(&mut rewards, id)?;
        self.save_rewards(&rewards)?;
        info!(reward = %id, ?state, "toggled reward");
        Ok(state)
    }

    pub fn delete_reward(&self, id: &EntityId) -> SdkResult<()> {
        let mut rewards = self.rewards();
        soft_delete(&mut rewards, id)?;
        self.save_rewards(&rewards)?;
        info!(reward = %id, "deleted reward");
        Ok(())
    }

    /// Spend points on a reward. The balance is recomputed from the store
    /// first; nothing is written if it does not cover the cost.
    pub fn redeem(&self, id: &EntityId, now: Timestamp) -> SdkResult<Redemption> {
        let mut rewards = self.rewards();
        let reward = find_visible(&mut rewards, id)?;
        let snapshot = self.snapshot();
        let balance = tally_ledger::balance(
            &snapshot.tasks,
            &snapshot.completions,
            &snapshot.bounty_completions,
            &snapshot.redemptions,
        );
        let redemption = tally_ledger::redeem(reward, balance, now)?;
        let mut redemptions = snapshot.redemptions;
        redemptions.push(redemption.clone());
        self.save_redemptions(&redemptions)?;
        info!(reward = %id, cost = redemption.cost, balance, "redeemed reward");
        Ok(redemption)
    }

    // ---- Bounties ----

    pub fn add_bounty(&self, title: &str, points: &str, deadline: &str) -> SdkResult<BountyTask> {
        let title = parse_title(title)?;
        let points = parse_points(points)?;
        let deadline = parse_deadline(deadline)?;
        let bounty = BountyTask::new(&title, signed(points), Some(deadline))?;
        let mut bounties = self.bounties();
        bounties.push(bounty.clone());
        self.save_bounties(&bounties)?;
        info!(bounty = %bounty.id, points = bounty.points, %deadline, "added bounty");
        Ok(bounty)
    }

    /// Shelve an open bounty or put it back. Completed bounties stay retired.
    pub fn toggle_bounty(&self, id: &EntityId) -> SdkResult<Lifecycle> {
        let mut bounties = self.bounties();
        let bounty = find_visible(&mut bounties, id)?;
        if bounty.is_completed() {
            return Err(ValidationError::AlreadyCompleted(bounty.title.clone()).into());
        }
        let state = bounty.lifecycle.toggled();
        bounty.lifecycle = state;
        self.save_bounties(&bounties)?;
        info!(bounty = %id, ?state, "toggled bounty");
        Ok(state)
    }

    pub fn delete_bounty(&self, id: &EntityId) -> SdkResult<()> {
        let mut bounties = self.bounties();
        soft_delete(&mut bounties, id)?;
        self.save_bounties(&bounties)?;
        info!(bounty = %id, "deleted bounty");
        Ok(())
    }

    /// Award an open bounty. The retired bounty and its award record are
    /// written in one batch.
    pub fn complete_bounty(
        &self,
        id: &EntityId,
        today: LocalDate,
        now: Timestamp,
    ) -> SdkResult<BountyCompletion> {
        let mut bounties = self.bounties();
        let bounty = find_visible(&mut bounties, id)?;
        let record = tally_ledger::complete_bounty(bounty, today, now)?;
        let mut records = self.bounty_completions();
        records.push(record.clone());
        self.store.apply_batch(&[
            BatchOp::Set {
                key: StateKey::Bounties.as_str().to_string(),
                value: encode(&bounties)?,
            },
            BatchOp::Set {
                key: StateKey::BountyCompletions.as_str().to_string(),
                value: encode(&records)?,
            },
        ])?;
        info!(bounty = %id, points = record.points, "completed bounty");
        Ok(record)
    }

    // ---- Levels ----

    /// Append a tier with default name, span and segments.
    pub fn add_level(&self) -> SdkResult<LevelTier> {
        let mut levels = self.levels();
        let id = tally_levels::edit::add_default(&mut levels);
        self.save_levels(&levels)?;
        info!(level = %id, "added level tier");
        let added = levels.pop().ok_or_else(|| not_found("level", &id))?;
        Ok(added)
    }

    /// Apply `patch`. The tier is saved even when it has problems; the first
    /// one found is returned for display.
    pub fn update_level(&self, id: &EntityId, patch: TierPatch) -> SdkResult<Option<TierAdvice>> {
        let mut levels = self.levels();
        if !tally_levels::edit::update(&mut levels, id, patch) {
            return Err(not_found("level", id));
        }
        self.save_levels(&levels)?;
        let advice = levels
            .iter()
            .find(|t| &t.id == id)
            .and_then(tally_levels::validate_tier);
        info!(level = %id, advice = ?advice, "updated level tier");
        Ok(advice)
    }

    /// Move a tier one place. Returns `false` if it is already at that end.
    pub fn move_level(&self, id: &EntityId, direction: Direction) -> SdkResult<bool> {
        let mut levels = self.levels();
        if !levels.iter().any(|t| &t.id == id) {
            return Err(not_found("level", id));
        }
        let moved = tally_levels::edit::move_tier(&mut levels, id, direction);
        if moved {
            self.save_levels(&levels)?;
            info!(level = %id, ?direction, "moved level tier");
        }
        Ok(moved)
    }

    pub fn delete_level(&self, id: &EntityId) -> SdkResult<()> {
        let mut levels = self.levels();
        if !tally_levels::edit::remove(&mut levels, id) {
            return Err(not_found("level", id));
        }
        self.save_levels(&levels)?;
        info!(level = %id, "deleted level tier");
        Ok(())
    }

    /// Every tier with the first problem found in it, in list order.
    pub fn level_advice(&self) -> Vec<(LevelTier, Option<TierAdvice>)> {
        self.levels()
            .into_iter()
            .map(|tier| {
                let advice = tally_levels::validate_tier(&tier);
                (tier, advice)
            })
            .collect()
    }

    // ---- Derived views ----

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            tasks: self.tasks(),
            completions: self.completions(),
            bounty_completions: self.bounty_completions(),
            redemptions: self.redemptions(),
        }
    }

    pub fn projection(&self, today: LocalDate) -> PointsProjection {
        PointsProjection::from_snapshot(&self.snapshot(), today)
    }

    /// Level standing for the current lifetime earnings.
    pub fn standing(&self) -> Standing {
        let snapshot = self.snapshot();
        let earned = tally_ledger::lifetime_earned(
            &snapshot.tasks,
            &snapshot.completions,
            &snapshot.bounty_completions,
        );
        tally_levels::compute_standing(signed(earned), &self.levels())
    }

    pub fn history(&self) -> Vec<DailyEntry> {
        tally_ledger::daily_history(&self.tasks(), &self.completions())
    }

    // ---- Backup ----

    pub fn export_backup(&self, app: &AppInfo, now: Timestamp) -> SdkResult<String> {
        Ok(tally_backup::export_json(&self.store, app, now)?)
    }

    /// Replace every collection with the contents of `text`. A rejected
    /// backup leaves the store untouched.
    pub fn import_backup(&self, text: &str) -> SdkResult<BackupMeta> {
        Ok(tally_backup::import(&self.store, text)?)
    }
}

/// Entities that can be shelved and soft-deleted.
trait Shelvable {
    const KIND: &'static str;
    fn id(&self) -> &EntityId;
    fn label(&self) -> &str;
    fn lifecycle(&self) -> Lifecycle;
    fn set_lifecycle(&mut self, state: Lifecycle);
}

impl Shelvable for Task {
    const KIND: &'static str = "task";
    fn id(&self) -> &EntityId {
        &self.id
    }
    fn label(&self) -> &str {
        &self.title
    }
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
    fn set_lifecycle(&mut self, state: Lifecycle) {
        self.lifecycle = state;
    }
}

impl Shelvable for Reward {
    const KIND: &'static str = "reward";
    fn id(&self) -> &EntityId {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
    fn set_lifecycle(&mut self, state: Lifecycle) {
        self.lifecycle = state;
    }
}

impl Shelvable for BountyTask {
    const KIND: &'static str = "bounty";
    fn id(&self) -> &EntityId {
        &self.id
    }
    fn label(&self) -> &str {
        &self.title
    }
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
    fn set_lifecycle(&mut self, state: Lifecycle) {
        self.lifecycle = state;
    }
}

/// Deleted entities are invisible to every operation.
fn find_visible<'a, T: Shelvable>(items: &'a mut [T], id: &EntityId) -> SdkResult<&'a mut T> {
    items
        .iter_mut()
        .find(|item| item.id() == id && !item.lifecycle().is_deleted())
        .ok_or_else(|| not_found(T::KIND, id))
}

fn toggle<T: Shelvable>(items: &mut [T], id: &EntityId) -> SdkResult<Lifecycle> {
    let item = find_visible(items, id)?;
    let state = item.lifecycle().toggled();
    item.set_lifecycle(state);
    Ok(state)
}

fn soft_delete<T: Shelvable>(items: &mut [T], id: &EntityId) -> SdkResult<()> {
    let item = find_visible(items, id)?;
    if item.lifecycle().is_active() {
        return Err(ValidationError::StillActive(item.label().to_string()).into());
    }
    item.set_lifecycle(Lifecycle::Deleted);
    Ok(())
}

fn not_found(kind: &str, id: &EntityId) -> SdkError {
    ValidationError::NotFound(format!("{kind} {id}")).into()
}

fn signed(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
