use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use tally_store::{BatchOp, KvStore, StateKey};
use tally_types::{format_timestamp, Timestamp};
use tracing::{info, warn};

use crate::document::{AppInfo, BackupDocument, BackupMeta, SCHEMA_VERSION};
use crate::error::{BackupError, BackupResult};

/// A document that passed every import check, ready to apply.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedBackup {
    pub meta: BackupMeta,
    pub data: Map<String, Value>,
}

/// Snapshot every state key of `store` into a backup document.
pub fn export<S: KvStore + ?Sized>(
    store: &S,
    app: &AppInfo,
    now: Timestamp,
) -> BackupResult<BackupDocument> {
    let mut data = Map::new();
    for key in StateKey::ALL {
        let raw = store.get(key.as_str())?;
        data.insert(key.as_str().to_string(), export_value(raw));
    }
    Ok(BackupDocument {
        schema_version: SCHEMA_VERSION,
        exported_at: format_timestamp(now),
        app: app.clone(),
        data,
    })
}

/// [`export`], rendered as two-space indented JSON.
pub fn export_json<S: KvStore + ?Sized>(
    store: &S,
    app: &AppInfo,
    now: Timestamp,
) -> BackupResult<String> {
    let document = export(store, app, now)?;
    serde_json::to_string_pretty(&document).map_err(|e| BackupError::Serialization(e.to_string()))
}

/// Stored values that re-encode to exactly the same bytes are embedded as
/// JSON. Anything else, including stored JSON strings and `null`, is kept as
/// the raw string so a restore writes it back unchanged.
fn export_value(raw: Option<String>) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value)
            if !matches!(value, Value::Null | Value::String(_))
                && serde_json::to_string(&value).ok().as_deref() == Some(raw.as_str()) =>
        {
            value
        }
        _ => Value::String(raw),
    }
}

/// Parse and check a backup, failing on the first problem:
/// unparseable text, then an unknown schema, then a document with none of
/// the state keys.
pub fn parse_and_validate(text: &str) -> BackupResult<ValidatedBackup> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| BackupError::MalformedPayload(e.to_string()))?;

    let Value::Object(mut root) = value else {
        return Err(BackupError::UnsupportedSchema("top level is not an object".into()));
    };
    let version = root.get("schemaVersion").and_then(Value::as_f64);
    if version != Some(f64::from(SCHEMA_VERSION)) {
        let found = root
            .get("schemaVersion")
            .map_or_else(|| "missing".to_string(), Value::to_string);
        return Err(BackupError::UnsupportedSchema(format!(
            "schemaVersion {found}, expected {SCHEMA_VERSION}"
        )));
    }
    let Some(Value::Object(data)) = root.remove("data") else {
        return Err(BackupError::UnsupportedSchema("data is missing or not an object".into()));
    };
    if !StateKey::ALL.iter().any(|k| data.contains_key(k.as_str())) {
        return Err(BackupError::EmptyOrUnrecognizedBackup);
    }

    let meta = BackupMeta {
        exported_at: root
            .get("exportedAt")
            .and_then(Value::as_str)
            .map(str::to_string),
        app: root
            .remove("app")
            .and_then(|app| serde_json::from_value(app).ok()),
    };
    Ok(ValidatedBackup { meta, data })
}

/// Writes that make the store match `data` for every state key. Keys absent
/// from `data` or set to `null` are removed; unknown keys are ignored.
pub fn plan_restore(data: &Map<String, Value>) -> BackupResult<Vec<BatchOp>> {
    StateKey::ALL
        .into_iter()
        .map(|key| {
            let key = key.as_str().to_string();
            let op = match data.get(&key) {
                None | Some(Value::Null) => BatchOp::Remove { key },
                Some(Value::String(raw)) => BatchOp::Set {
                    key,
                    value: raw.clone(),
                },
                Some(other) => BatchOp::Set {
                    key,
                    value: serde_json::to_string(other)
                        .map_err(|e| BackupError::Serialization(e.to_string()))?,
                },
            };
            Ok(op)
        })
        .collect()
}

/// Validate `text` and overwrite every state key in `store` from it.
///
/// Nothing is written unless validation and planning both succeed, and the
/// writes land as one batch.
pub fn import<S: KvStore + ?Sized>(store: &S, text: &str) -> BackupResult<BackupMeta> {
    let backup = parse_and_validate(text).inspect_err(|e| warn!(error = %e, "backup rejected"))?;
    let ops = plan_restore(&backup.data)?;
    store.apply_batch(&ops)?;
    let unknown = backup
        .data
        .keys()
        .filter(|k| StateKey::from_store_key(k).is_none())
        .count();
    info!(
        exported_at = backup.meta.exported_at.as_deref().unwrap_or("unknown"),
        keys = ops.len(),
        ignored = unknown,
        "backup restored"
    );
    Ok(backup.meta)
}

/// File name for an export taken at local wall-clock time `at`.
pub fn backup_file_name(at: NaiveDateTime) -> String {
    format!("tally-backup-{}.json", at.format("%Y%m%d_%H%M%S"))
}
