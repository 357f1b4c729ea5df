//! Level engine for the tally ledger.
//!
//! Levels are a lens over lifetime earned points: nothing about a level is
//! stored, so reordering or editing tiers re-levels the user immediately
//! without touching history.
//!
//! - [`compute_standing`] -- resolve lifetime points to a tier and sub-tier
//! - [`roman`] -- sub-tier numerals (I, II, III, ...)
//! - [`validate_tier`] -- advisory checks for the tier editor
//! - [`edit`] -- add / update / reorder / delete operations on a tier list

pub mod advice;
pub mod edit;
pub mod engine;
pub mod roman;

pub use advice::{validate_tier, TierAdvice};
pub use edit::{Direction, TierPatch};
pub use engine::{compute_standing, LevelStatus, Standing};
pub use roman::roman;
