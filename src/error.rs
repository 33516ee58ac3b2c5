//! Error types for variable access

use thiserror::Error;

/// Errors surfaced by [`Variable`](crate::Variable) and [`RecordStore`](crate::RecordStore)
#[derive(Debug, Error)]
pub enum VariableError {
    /// The record stored under `key` is not a JSON object
    #[error("stored record '{key}' is corrupt: {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored value for `name` does not decode as the variable's type
    #[error("stored value of '{name}' in record '{key}' has the wrong shape: {source}")]
    InvalidValue {
        name: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be converted to JSON
    #[error("failed to encode value of '{name}': {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl VariableError {
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, VariableError::CorruptRecord { .. })
    }
}

pub type Result<T> = std::result::Result<T, VariableError>;
