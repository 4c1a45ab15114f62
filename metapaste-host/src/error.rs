//! Error types for the host layer.

use metapaste_types::EntityId;
use thiserror::Error;

/// Result type for metadata store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a metadata store may report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity does not exist in the host.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The host rejected a write.
    #[error("write rejected for entity {entity} key '{key}': {reason}")]
    WriteRejected {
        entity: EntityId,
        key: String,
        reason: String,
    },

    /// The backing store is unusable (e.g. a poisoned lock or lost connection).
    #[error("storage backend error: {0}")]
    Backend(String),
}
