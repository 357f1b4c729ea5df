//! Key-value state store for the tally points ledger.
//!
//! Every persisted collection lives under one of seven fixed keys, each
//! holding a JSON-encoded string. The store never interprets values; typed
//! decoding happens in [`decode`], which falls back to an empty collection
//! when a value is missing or corrupt rather than failing the caller.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileKvStore`] -- single JSON file, replaced atomically on every write
//!
//! # Design Rules
//!
//! 1. Last write wins. There are no transactions across callers.
//! 2. [`KvStore::apply_batch`] is all-or-nothing within one backend.
//! 3. Every committed write notifies subscribers after the write is visible.
//! 4. Reads of typed collections never fail; corruption degrades to defaults.

pub mod decode;
pub mod error;
pub mod file;
pub mod key;
pub mod listeners;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use decode::KvStoreExt;
pub use error::{StoreError, StoreResult};
pub use file::FileKvStore;
pub use key::StateKey;
pub use listeners::{Listener, SubscriptionId};
pub use memory::InMemoryKvStore;
pub use traits::{BatchOp, ChangeKind, KvStore, StoreEvent};
