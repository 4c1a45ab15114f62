//! Host platform contracts for Metapaste.
//!
//! The editor never talks to a content platform directly. Everything it
//! needs goes through the narrow traits defined here:
//! - [`MetadataStore`]: per-entity metadata reads and writes
//! - [`CapabilityChecker`]: "can the current user do X"
//! - [`ScalarCodec`]: recognizes and decodes values the host stored serialized
//! - [`TokenService`]: anti-forgery token issuance and verification
//!
//! Each trait ships with an in-process implementation so the editor can be
//! exercised without a live host. [`HostServices`] bundles one of each for
//! injection into the coordinator.

mod capabilities;
mod codec;
mod error;
pub mod query;
mod services;
mod store;
mod token;

pub use capabilities::{CapabilityChecker, StaticCapabilities};
pub use codec::{MAX_DEPTH, PhpSerializedCodec, ScalarCodec};
pub use error::{StoreError, StoreResult};
pub use services::HostServices;
pub use store::{InMemoryMetadataStore, MetadataStore};
pub use token::{HashTokenService, TokenService, DEFAULT_TOKEN_LIFETIME_SECS};
