//! Domain types for the tally points ledger.
//!
//! This crate holds the entities every other tally crate works with. It has
//! no knowledge of storage or accounting; it only defines shapes, lifecycle
//! rules, and the input checks applied when entities are created.
//!
//! # Key Types
//!
//! - [`Task`] -- recurring daily task, earnings capped per day
//! - [`BountyTask`] / [`BountyCompletion`] -- one-shot deadline task and its frozen award record
//! - [`Reward`] / [`Redemption`] -- redeemable reward and its frozen purchase record
//! - [`CompletionLog`] -- calendar date to set of completed task ids
//! - [`LevelTier`] -- one band of the configurable leveling scheme
//! - [`Lifecycle`] -- `Active` / `Disabled` / `Deleted` state shared by editable entities

pub mod bounty;
pub mod completion;
pub mod date;
pub mod error;
pub mod id;
pub mod level;
pub mod lifecycle;
pub mod reward;
pub mod task;
pub mod validation;

pub use bounty::{BountyCompletion, BountyTask};
pub use completion::CompletionLog;
pub use date::{format_timestamp, LocalDate, Timestamp};
pub use error::{TypeError, ValidationError};
pub use id::{EntityId, IdKind};
pub use level::LevelTier;
pub use lifecycle::Lifecycle;
pub use reward::{Redemption, Reward};
pub use task::Task;

/// Ceiling on the points a single calendar date can contribute from daily
/// tasks. Bounties are not subject to it.
pub const DAILY_POINTS_CAP: u64 = 150;
