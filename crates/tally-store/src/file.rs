use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::listeners::{Listener, Listeners, SubscriptionId};
use crate::traits::{BatchOp, ChangeKind, KvStore, StoreEvent};

/// Key-value store persisted as one JSON object (`{"key": "value"}`) on disk.
///
/// Reads are served from memory. Every write builds the next state, writes it
/// to a temporary file in the same directory and renames it over the data
/// file; the in-memory view is only updated once the rename succeeded. A
/// failed write therefore leaves both disk and memory at the previous state.
pub struct FileKvStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
    listeners: Listeners,
}

impl FileKvStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = read_file(&path)?;
        debug!(path = %path.display(), keys = values.len(), "opened file store");
        Ok(Self {
            path,
            values: RwLock::new(values),
            listeners: Listeners::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the data file, picking up writes made by another process.
    ///
    /// Subscribers receive one `Set` or `Removed` event per key that changed.
    pub fn reload(&self) -> StoreResult<()> {
        let fresh = read_file(&self.path)?;
        let events = {
            let mut map = self.values.write().expect("lock poisoned");
            let events = diff_events(&map, &fresh);
            *map = fresh;
            events
        };
        if !events.is_empty() {
            info!(path = %self.path.display(), changed = events.len(), "reloaded file store");
        }
        self.listeners.notify(&events);
        Ok(())
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let encoded = serde_json::to_vec_pretty(values)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            reason: e.error.to_string(),
        })?;
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn apply_batch(&self, ops: &[BatchOp]) -> StoreResult<()> {
        let events: Vec<StoreEvent> = {
            let mut map = self.values.write().expect("lock poisoned");
            let mut next = map.clone();
            for op in ops {
                match op {
                    BatchOp::Set { key, value } => {
                        next.insert(key.clone(), value.clone());
                    }
                    BatchOp::Remove { key } => {
                        next.remove(key);
                    }
                }
            }
            self.persist(&next)?;
            *map = next;
            ops.iter().map(BatchOp::event).collect()
        };
        debug!(path = %self.path.display(), ops = ops.len(), "committed batch");
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

impl std::fmt::Debug for FileKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKvStore")
            .field("path", &self.path)
            .finish()
    }
}

fn read_file(path: &Path) -> StoreResult<BTreeMap<String, String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn diff_events(old: &BTreeMap<String, String>, new: &BTreeMap<String, String>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    for (key, value) in new {
        if old.get(key) != Some(value) {
            events.push(StoreEvent { key: key.clone(), kind: ChangeKind::Set });
        }
    }
    for key in old.keys() {
        if !new.contains_key(key) {
            events.push(StoreEvent { key: key.clone(), kind: ChangeKind::Removed });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = FileKvStore::open(&path).unwrap();
            store.set("tm_tasks_v1", "[]").unwrap();
            store.set("raw", "not json {").unwrap();
        }
        let store = FileKvStore::open(&path).unwrap();
        assert_eq!(store.get("tm_tasks_v1").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("raw").unwrap().as_deref(), Some("not json {"));
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = FileKvStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"[1, 2, 3]").unwrap();
        assert!(matches!(
            FileKvStore::open(&path),
            Err(StoreError::CorruptFile { .. })
        ));
    }

    #[test]
    fn reload_sees_other_writers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let a = FileKvStore::open(&path).unwrap();
        let b = FileKvStore::open(&path).unwrap();
        a.set("k", "from-a").unwrap();
        a.set("old", "x").unwrap();

        b.reload().unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("from-a"));

        a.remove("old").unwrap();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        b.subscribe(Box::new(move |e: &StoreEvent| sink.lock().unwrap().push(e.clone())));
        b.reload().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].key, "old");
        assert_eq!(seen[0].kind, ChangeKind::Removed);
    }
}
