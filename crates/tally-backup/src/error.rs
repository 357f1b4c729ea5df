use tally_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    MalformedPayload(String),

    #[error("unsupported backup schema: {0}")]
    UnsupportedSchema(String),

    #[error("backup contains none of the recognized data keys")]
    EmptyOrUnrecognizedBackup,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type BackupResult<T> = Result<T, BackupError>;
