//! Points accounting for the tally ledger.
//!
//! This crate turns the raw event logs (daily completions, bounty awards,
//! redemptions) plus the current task list into derived numbers. It provides:
//! - Pure point functions: per-date capped earnings, lifetime totals, balance
//! - A [`PointsProjection`] computing all totals from a [`LedgerSnapshot`]
//! - Guarded mutations that validate before producing a history record
//!   (redeeming a reward, completing a bounty)
//!
//! Nothing here reads or writes a store. Callers pass the full snapshot in.

pub mod error;
pub mod ops;
pub mod points;
pub mod projection;

pub use error::LedgerError;
pub use ops::{complete_bounty, redeem, toggle_completion};
pub use points::{
    balance, earned_for_date, lifetime_bounty_earned, lifetime_daily_earned, lifetime_earned,
    lifetime_spent,
};
pub use projection::{daily_history, DailyEntry, LedgerSnapshot, PointsProjection};
