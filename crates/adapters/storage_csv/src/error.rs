//! Storage-specific error type wrapping CSV, JSON and IO failures.

use smarthome_domain::error::SmartHomeError;

/// Errors originating from the CSV storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing or replacing the file failed.
    #[error("storage IO error")]
    Io(#[from] std::io::Error),

    /// The file is not well-formed CSV.
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// The header row is not `Home Name,Devices`.
    #[error("unexpected header row {found:?}")]
    UnexpectedHeader { found: String },

    /// A row's devices column is not a JSON array.
    #[error("line {line}: devices column is not a JSON array")]
    MalformedJson {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// A row parsed but describes an invalid home or device.
    #[error("line {line}: invalid home record")]
    InvalidRecord {
        line: u64,
        #[source]
        source: SmartHomeError,
    },

    /// Failed to encode a home's devices as JSON.
    #[error("JSON serialization error")]
    Encode(#[source] serde_json::Error),
}

impl From<StorageError> for SmartHomeError {
    fn from(err: StorageError) -> Self {
        Self::Persistence(Box::new(err))
    }
}
