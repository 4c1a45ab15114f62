//! Metadata storage contract and the in-memory reference store.

use crate::error::{StoreError, StoreResult};
use metapaste_types::{EntityId, MetaValue, MetadataCollection};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Per-entity metadata operations exposed by the host platform.
///
/// Atomicity across calls is whatever the host provides; callers must not
/// assume a sequence of calls is applied as a unit.
pub trait MetadataStore: Send + Sync {
    /// Returns every key and all of its values for `entity`.
    fn all_metadata(&self, entity: EntityId) -> StoreResult<MetadataCollection>;

    /// Appends one more value under `key`, keeping existing values.
    fn add_value(&self, entity: EntityId, key: &str, value: MetaValue) -> StoreResult<()>;

    /// Removes every value stored under `key`. Returns whether anything was removed.
    fn delete_all(&self, entity: EntityId, key: &str) -> StoreResult<bool>;

    /// Makes `value` the only value under `key`, adding the key if absent.
    fn set_single(&self, entity: EntityId, key: &str, value: MetaValue) -> StoreResult<()>;
}

/// Thread-safe in-memory metadata store.
///
/// Entities must be registered with [`InMemoryMetadataStore::insert_entity`]
/// before use; operations on unknown ids fail with
/// [`StoreError::EntityNotFound`], mirroring a host that refuses to attach
/// metadata to a missing post.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    entities: Mutex<HashMap<EntityId, MetadataCollection>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of an entity and its initial metadata.
    #[must_use]
    pub fn with_entity(self, entity: EntityId, metadata: MetadataCollection) -> Self {
        if let Ok(mut entities) = self.entities.lock() {
            entities.insert(entity, metadata);
        }
        self
    }

    /// Registers (or replaces) an entity and its metadata.
    pub fn insert_entity(&self, entity: EntityId, metadata: MetadataCollection) -> StoreResult<()> {
        self.lock()?.insert(entity, metadata);
        Ok(())
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<EntityId, MetadataCollection>>> {
        self.entities
            .lock()
            .map_err(|e| StoreError::Backend(format!("metadata lock poisoned: {e}")))
    }

    fn with_collection<T>(
        &self,
        entity: EntityId,
        f: impl FnOnce(&mut MetadataCollection) -> T,
    ) -> StoreResult<T> {
        let mut entities = self.lock()?;
        let collection = entities
            .get_mut(&entity)
            .ok_or(StoreError::EntityNotFound(entity))?;
        Ok(f(collection))
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn all_metadata(&self, entity: EntityId) -> StoreResult<MetadataCollection> {
        self.with_collection(entity, |c| c.clone())
    }

    fn add_value(&self, entity: EntityId, key: &str, value: MetaValue) -> StoreResult<()> {
        debug!("add_value entity={} key={}", entity, key);
        self.with_collection(entity, |c| c.add(key, value))
    }

    fn delete_all(&self, entity: EntityId, key: &str) -> StoreResult<bool> {
        debug!("delete_all entity={} key={}", entity, key);
        self.with_collection(entity, |c| c.remove(key).is_some())
    }

    fn set_single(&self, entity: EntityId, key: &str, value: MetaValue) -> StoreResult<()> {
        debug!("set_single entity={} key={}", entity, key);
        self.with_collection(entity, |c| c.set_single(key, value))
    }
}
