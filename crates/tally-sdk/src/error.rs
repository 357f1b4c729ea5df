use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Validation(#[from] tally_types::ValidationError),

    #[error(transparent)]
    Ledger(#[from] tally_ledger::LedgerError),

    #[error("backup error: {0}")]
    Backup(#[from] tally_backup::BackupError),

    #[error("store error: {0}")]
    Store(#[from] tally_store::StoreError),

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
