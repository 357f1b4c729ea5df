use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version written into every export. Imports accept only this version.
pub const SCHEMA_VERSION: u32 = 1;

/// Free-form provenance block carried in each backup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub note: String,
}

impl AppInfo {
    pub fn new(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: note.into(),
        }
    }
}

/// On-disk backup document.
///
/// `data` holds one entry per store key: the stored value as JSON when it
/// re-encodes to the same bytes, otherwise the raw stored string, or `null`
/// when the key was absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub schema_version: u32,
    pub exported_at: String,
    pub app: AppInfo,
    pub data: Map<String, Value>,
}

/// What a successful import reports back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMeta {
    /// `exportedAt` as written in the document, if it was a string.
    pub exported_at: Option<String>,
    pub app: Option<AppInfo>,
}
