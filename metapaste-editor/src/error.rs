//! Error types for the editor.
//!
//! Gate failures (missing capability, unchecked box, bad token, malformed
//! body) are not errors; they are reported through return values. Only
//! collaborator failures surface here.

use metapaste_host::StoreError;
use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("metadata store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("save listener '{listener}' failed: {message}")]
    Listener { listener: String, message: String },
}

impl From<metapaste_types::Error> for EditorError {
    fn from(err: metapaste_types::Error) -> Self {
        match err {
            metapaste_types::Error::Serialization(e) => Self::Serialization(e),
            other => Self::Config(other.to_string()),
        }
    }
}
