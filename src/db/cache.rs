use log::warn;
use std::sync::Arc;

use super::models::Entity;
use super::store::KeyValueStore;

/// Look-aside copy of the remote collections.
///
/// Reads never fail: missing, unreadable or malformed entries come back as an
/// empty collection. Writes that the storage rejects are logged and dropped.
/// Nothing here is transactional across kinds.
#[derive(Clone)]
pub struct LocalCache {
    storage: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn get<T: Entity>(&self) -> Vec<T> {
        let key = T::KIND.key();
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read cached {}: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entities) => entities,
            Err(e) => {
                warn!("Ignoring malformed cached {}: {}", key, e);
                Vec::new()
            }
        }
    }

    pub fn put<T: Entity>(&self, entities: &[T]) {
        let key = T::KIND.key();
        let raw = match serde_json::to_string(entities) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode {} for cache: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.storage.set(key, &raw) {
            warn!("Dropped cache write for {}: {}", key, e);
        }
    }

    pub fn find<T: Entity>(&self, id: &str) -> Option<T> {
        self.get::<T>().into_iter().find(|e| e.id() == id)
    }

    pub fn contains<T: Entity>(&self, id: &str) -> bool {
        self.get::<T>().iter().any(|e| e.id() == id)
    }

    /// Replace the entity with the same id, or append it.
    pub fn upsert<T: Entity>(&self, entity: T) {
        let mut entities = self.get::<T>();
        match entities.iter_mut().find(|e| e.id() == entity.id()) {
            Some(existing) => *existing = entity,
            None => entities.push(entity),
        }
        self.put(&entities);
    }

    /// Returns whether anything was removed.
    pub fn remove<T: Entity>(&self, id: &str) -> bool {
        let mut entities = self.get::<T>();
        let before = entities.len();
        entities.retain(|e| e.id() != id);
        let removed = entities.len() != before;
        if removed {
            self.put(&entities);
        }
        removed
    }

    pub fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    pub fn write_raw(&self, key: &str, value: &str) -> bool {
        match self.storage.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropped write for {}: {}", key, e);
                false
            }
        }
    }

    pub fn remove_raw(&self, key: &str) -> bool {
        match self.storage.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove {}: {}", key, e);
                false
            }
        }
    }
}
