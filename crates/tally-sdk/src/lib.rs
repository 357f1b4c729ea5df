//! High-level SDK for the tally points ledger.
//!
//! [`Tally`] owns a [`tally_store::KvStore`] and exposes every user-facing
//! operation: editing tasks, rewards, bounties and level tiers, recording
//! completions and redemptions, the derived points and level views, and
//! backup export/import. This is the main entry point for applications
//! embedding tally.

pub mod config;
pub mod error;
pub mod seed;
pub mod tally;

pub use config::{BackupConfig, TallyConfig};
pub use error::{SdkError, SdkResult};
pub use tally::Tally;

// Re-export key types
pub use tally_backup::{AppInfo, BackupMeta};
pub use tally_ledger::{DailyEntry, PointsProjection};
pub use tally_levels::{Direction, LevelStatus, Standing, TierAdvice, TierPatch};
pub use tally_store::{FileKvStore, InMemoryKvStore, KvStore, StateKey};
pub use tally_types::{
    BountyCompletion, BountyTask, EntityId, LevelTier, Lifecycle, LocalDate, Redemption, Reward,
    Task, Timestamp,
};
