//! Core type definitions for Metapaste.
//!
//! This crate defines the host-agnostic types shared by the collaborator
//! layer and the editor:
//! - [`EntityId`]: opaque numeric identifier of a post-like record
//! - [`MetadataCollection`]: ordered key → value-list store of one entity
//! - [`Submission`] and [`ChangeSet`]: the transient save-time payload
//!
//! Nothing here talks to storage. The host traits live in `metapaste-host`.

mod ids;
mod meta;
mod submission;

pub use ids::EntityId;
pub use meta::{MetaValue, MetadataCollection};
pub use submission::{ChangeSet, Submission};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
