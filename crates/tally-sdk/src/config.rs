use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_backup::AppInfo;
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Settings read from `tally.toml`. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// JSON file backing the store.
    pub data_file: PathBuf,
    pub backup: BackupConfig,
}

/// Provenance written into exported backups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub app_name: String,
    pub note: String,
}

impl TallyConfig {
    /// Looked up in the working directory when no path is given.
    pub const FILE_NAME: &'static str = "tally.toml";

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| SdkError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `explicit` if given, else [`Self::FILE_NAME`] if it exists,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>) -> SdkResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = Path::new(Self::FILE_NAME);
        if local.is_file() {
            debug!(path = %local.display(), "using local config");
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn app_info(&self) -> AppInfo {
        AppInfo::new(&self.backup.app_name, &self.backup.note)
    }
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("tally-data.json"),
            backup: BackupConfig::default(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            app_name: "Tally".into(),
            note: "Local points ledger backup. Import restores every collection.".into(),
        }
    }
}
