use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::listeners::{Listener, Listeners, SubscriptionId};
use crate::traits::{BatchOp, KvStore, StoreEvent};

/// In-memory, BTreeMap-based key-value store.
///
/// Intended for tests and embedding. Values are held behind a `RwLock`; a
/// batch is applied under a single write lock so readers never observe half
/// of it.
pub struct InMemoryKvStore {
    values: RwLock<BTreeMap<String, String>>,
    listeners: Listeners,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            listeners: Listeners::new(),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }

    /// Copy of every key and value, sorted by key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.read().expect("lock poisoned").clone()
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn apply_batch(&self, ops: &[BatchOp]) -> StoreResult<()> {
        let events: Vec<StoreEvent> = {
            let mut map = self.values.write().expect("lock poisoned");
            for op in ops {
                match op {
                    BatchOp::Set { key, value } => {
                        map.insert(key.clone(), value.clone());
                    }
                    BatchOp::Remove { key } => {
                        map.remove(key);
                    }
                }
            }
            ops.iter().map(BatchOp::event).collect()
        };
        self.listeners.notify(&events);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
