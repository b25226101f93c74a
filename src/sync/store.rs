use log::{debug, error, warn};
use std::sync::Arc;

use super::remote::{ImportPayload, RemoteStore};
use crate::db::models::EXPORT_VERSION;
use crate::db::{Entity, ExportEnvelope, Folder, LocalCache, Prompt};
use crate::error::{Result, VaultError};
use crate::utils::time::now_millis;

/// Reconciles the remote store with the local cache.
///
/// Reads fall back to the cache when the remote is unavailable. Writes go to
/// the remote first and only touch the cache once the remote accepted them;
/// a failed write is returned to the caller.
pub struct SyncStore {
    remote: Arc<dyn RemoteStore>,
    cache: LocalCache,
}

impl SyncStore {
    pub fn new(remote: Arc<dyn RemoteStore>, cache: LocalCache) -> Self {
        Self { remote, cache }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    /// Fetch a collection, refreshing the cache. Serves the cached copy when
    /// the remote fails.
    pub async fn load<T: Entity>(&self) -> Vec<T> {
        match self.fetch::<T>().await {
            Ok(entities) => {
                self.cache.put(&entities);
                entities
            }
            Err(e) => {
                warn!("Loading {} from remote failed, using cache: {}", T::KIND.key(), e);
                self.cache.get::<T>()
            }
        }
    }

    async fn fetch<T: Entity>(&self) -> Result<Vec<T>> {
        let values = self.remote.list(T::KIND).await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(VaultError::from))
            .collect()
    }

    /// Create or update depending on whether the cache already knows the id.
    ///
    /// The cache is only advisory: after a fresh start with an empty cache an
    /// existing entity is sent as a create. Use [`SyncStore::update`] when the
    /// caller knows better.
    pub async fn save<T: Entity>(&self, entity: T) -> Result<T> {
        if self.cache.contains::<T>(entity.id()) {
            self.update(entity).await
        } else {
            self.create(entity).await
        }
    }

    pub async fn create<T: Entity>(&self, mut entity: T) -> Result<T> {
        entity.touch(now_millis());
        let id = entity.id().to_string();
        debug!("Creating {} {}", T::KIND, id);
        let body = serde_json::to_value(&entity)?;
        let saved = self
            .remote
            .create(T::KIND, body)
            .await
            .and_then(|v| serde_json::from_value::<T>(v).map_err(VaultError::from))
            .map_err(|e| {
                error!("Failed to create {} {}: {}", T::KIND, id, e);
                e
            })?;
        self.cache.upsert(saved.clone());
        Ok(saved)
    }

    pub async fn update<T: Entity>(&self, mut entity: T) -> Result<T> {
        entity.touch(now_millis());
        let id = entity.id().to_string();
        debug!("Updating {} {}", T::KIND, id);
        let body = serde_json::to_value(&entity)?;
        let saved = self
            .remote
            .update(T::KIND, &id, body)
            .await
            .and_then(|v| serde_json::from_value::<T>(v).map_err(VaultError::from))
            .map_err(|e| {
                error!("Failed to update {} {}: {}", T::KIND, id, e);
                e
            })?;
        self.cache.upsert(saved.clone());
        Ok(saved)
    }

    pub async fn delete<T: Entity>(&self, id: &str) -> Result<()> {
        self.remote.delete(T::KIND, id).await.map_err(|e| {
            error!("Failed to delete {} {}: {}", T::KIND, id, e);
            e
        })?;
        self.cache.remove::<T>(id);
        Ok(())
    }

    /// Send a whole data set in one call; on success the cache is replaced by it.
    pub async fn import(&self, prompts: Vec<Prompt>, folders: Vec<Folder>) -> Result<()> {
        let payload = ImportPayload { prompts, folders };
        self.remote.import(&payload).await.map_err(|e| {
            error!(
                "Import of {} prompts and {} folders failed: {}",
                payload.prompts.len(),
                payload.folders.len(),
                e
            );
            e
        })?;
        self.cache.put(&payload.prompts);
        self.cache.put(&payload.folders);
        Ok(())
    }

    /// Export what the cache currently holds.
    pub fn export(&self) -> ExportEnvelope {
        ExportEnvelope {
            version: EXPORT_VERSION,
            exported_at: now_millis(),
            prompts: self.cache.get(),
            folders: self.cache.get(),
        }
    }

    fn cached_prompt(&self, id: &str) -> Result<Prompt> {
        self.cache.find::<Prompt>(id).ok_or_else(|| VaultError::NotFound {
            kind: Prompt::KIND.to_string(),
            id: id.to_string(),
        })
    }

    /// Snapshot the prompt's current title and content into its history.
    pub async fn create_prompt_version(&self, prompt_id: &str) -> Result<Prompt> {
        let mut prompt = self.cached_prompt(prompt_id)?;
        prompt.push_version(now_millis());
        self.update(prompt).await
    }

    /// Bring back an older title and content. The state being replaced is
    /// snapshotted first so the restore itself can be undone.
    pub async fn restore_prompt_version(&self, prompt_id: &str, version_id: &str) -> Result<Prompt> {
        let mut prompt = self.cached_prompt(prompt_id)?;
        let version = prompt
            .find_version(version_id)
            .cloned()
            .ok_or_else(|| VaultError::NotFound {
                kind: "version".to_string(),
                id: version_id.to_string(),
            })?;
        prompt.push_version(now_millis());
        prompt.title = version.title;
        prompt.content = version.content;
        self.update(prompt).await
    }
}
