//! Typed decoding of persisted values.
//!
//! Each key is decoded explicitly. A value that is missing, not JSON, or of
//! the wrong container shape decodes to the empty collection; individual
//! records that fail to decode are dropped. Both cases are logged, neither is
//! an error for the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tally_types::date::parse_date;
use tally_types::{CompletionLog, EntityId};
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::key::StateKey;
use crate::traits::KvStore;

/// Decode a JSON array, keeping every element that matches `T`.
pub fn decode_list<T: DeserializeOwned>(key: StateKey, raw: Option<&str>) -> Vec<T> {
    let Some(value) = parse(key, raw) else {
        return Vec::new();
    };
    let Value::Array(items) = value else {
        warn!(key = %key, "expected an array; using empty list");
        return Vec::new();
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key = %key, index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();
    if decoded.len() != total {
        warn!(key = %key, kept = decoded.len(), total, "dropped malformed records");
    }
    decoded
}

/// Decode the completion log. Entries with a malformed date or a non-array
/// value are skipped; non-string ids inside a day are ignored.
pub fn decode_completions(raw: Option<&str>) -> CompletionLog {
    let key = StateKey::Completions;
    let Some(value) = parse(key, raw) else {
        return CompletionLog::new();
    };
    let Value::Object(days) = value else {
        warn!(key = %key, "expected an object; using empty log");
        return CompletionLog::new();
    };
    let mut pairs = Vec::new();
    for (date_key, ids) in days {
        let Ok(date) = parse_date(&date_key) else {
            warn!(key = %key, date = %date_key, "skipping entry with malformed date");
            continue;
        };
        let Value::Array(ids) = ids else {
            warn!(key = %key, date = %date_key, "skipping entry that is not an array");
            continue;
        };
        pairs.extend(
            ids.iter()
                .filter_map(Value::as_str)
                .map(|id| (date, EntityId::from(id))),
        );
    }
    pairs.into_iter().collect()
}

/// Canonical encoding written back to the store.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn parse(key: StateKey, raw: Option<&str>) -> Option<Value> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(Value::Null) => None,
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key = %key, error = %e, "stored value is not valid JSON; using default");
            None
        }
    }
}

/// Typed read/write helpers available on every [`KvStore`].
pub trait KvStoreExt: KvStore {
    /// Raw value for `key`. A backend read failure is logged and treated as
    /// an absent key.
    fn get_or_absent(&self, key: StateKey) -> Option<String> {
        match self.get(key.as_str()) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = %key, error = %e, "store read failed; treating as absent");
                None
            }
        }
    }

    fn load_list<T: DeserializeOwned>(&self, key: StateKey) -> Vec<T> {
        decode_list(key, self.get_or_absent(key).as_deref())
    }

    fn load_completions(&self) -> CompletionLog {
        decode_completions(self.get_or_absent(StateKey::Completions).as_deref())
    }

    fn save<T: Serialize + ?Sized>(&self, key: StateKey, value: &T) -> StoreResult<()> {
        self.set(key.as_str(), &encode(value)?)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKvStore;
    use tally_types::{LevelTier, Task};

    #[test]
    fn missing_and_garbage_decode_to_empty() {
        assert!(decode_list::<Task>(StateKey::Tasks, None).is_empty());
        assert!(decode_list::<Task>(StateKey::Tasks, Some("")).is_empty());
        assert!(decode_list::<Task>(StateKey::Tasks, Some("{not json")).is_empty());
        assert!(decode_list::<Task>(StateKey::Tasks, Some("null")).is_empty());
        assert!(decode_list::<Task>(StateKey::Tasks, Some("{\"a\":1}")).is_empty());
        assert!(decode_completions(Some("[1,2]")).is_empty());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let raw = r#"[
            {"id":"lv_a","name":"Bronze","span":500,"segments":5},
            {"id":"lv_b","name":"Broken","span":null,"segments":5},
            {"id":"lv_c","name":"Silver","span":1000,"segments":5}
        ]"#;
        let tiers: Vec<LevelTier> = decode_list(StateKey::Levels, Some(raw));
        let names: Vec<_> = tiers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Bronze", "Silver"]);
    }

    #[test]
    fn completions_skip_bad_entries() {
        let raw = r#"{"2024-01-01":["t_a","t_b",3],"garbage":["t_a"],"2024-01-02":"t_a"}"#;
        let log = decode_completions(Some(raw));
        assert_eq!(log.dates().count(), 1);
        assert_eq!(log.completed_on(parse_date("2024-01-01").unwrap()).count(), 2);
    }

    #[test]
    fn save_then_load() {
        let store = InMemoryKvStore::new();
        let tasks = vec![Task::with_id("t_read", "Read", 20)];
        store.save(StateKey::Tasks, &tasks).unwrap();
        let loaded: Vec<Task> = store.load_list(StateKey::Tasks);
        assert_eq!(loaded, tasks);
        assert_eq!(
            store.get(StateKey::Tasks.as_str()).unwrap().as_deref(),
            Some(r#"[{"id":"t_read","title":"Read","points":20,"active":true}]"#)
        );
    }
}
