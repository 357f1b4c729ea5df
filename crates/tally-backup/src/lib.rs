//! Backup codec for the tally ledger.
//!
//! Exports every persisted key into one versioned JSON document and restores
//! such a document into a store. A restore is validated completely before
//! the first write and then committed as a single batch.

pub mod codec;
pub mod document;
pub mod error;

pub use codec::{
    backup_file_name, export, export_json, import, parse_and_validate, plan_restore, ValidatedBackup,
};
pub use document::{AppInfo, BackupDocument, BackupMeta, SCHEMA_VERSION};
pub use error::{BackupError, BackupResult};
