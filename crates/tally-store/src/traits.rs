use crate::error::StoreResult;
use crate::listeners::{Listener, SubscriptionId};

/// What happened to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Removed,
}

/// Change notification delivered to subscribers after a write is visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
    pub kind: ChangeKind,
}

/// One write inside a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl BatchOp {
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }

    pub(crate) fn event(&self) -> StoreEvent {
        let kind = match self {
            Self::Set { .. } => ChangeKind::Set,
            Self::Remove { .. } => ChangeKind::Removed,
        };
        StoreEvent {
            key: self.key().to_string(),
            kind,
        }
    }
}

/// Durable string key-value store.
///
/// All implementations must satisfy these invariants:
/// - Last write wins; no locking is visible to callers beyond a single call.
/// - `apply_batch` commits every op or none of them.
/// - Subscribers are notified after the change is readable, never before.
/// - The store never interprets values.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.apply_batch(&[BatchOp::Set {
            key: key.to_string(),
            value: value.to_string(),
        }])
    }

    /// Remove `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool> {
        let existed = self.get(key)?.is_some();
        self.apply_batch(&[BatchOp::Remove {
            key: key.to_string(),
        }])?;
        Ok(existed)
    }

    /// Apply several writes as one unit.
    fn apply_batch(&self, ops: &[BatchOp]) -> StoreResult<()>;

    /// Register a change listener.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Drop a listener. Returns `true` if it was registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
