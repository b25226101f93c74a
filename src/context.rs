use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{KeyValueStore, LocalCache, SqliteStorage};
use crate::sync::{migrate_legacy, ConnectionMonitor, HttpRemote, RemoteStore, SyncStore};

/// Everything a running instance shares: built once at startup and torn
/// down with [`AppContext::shutdown`].
pub struct AppContext {
    pub config: Config,
    pub store: SyncStore,
    pub monitor: ConnectionMonitor,
}

impl AppContext {
    /// SQLite-backed cache under the data directory, HTTP remote from config.
    pub fn open(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("Failed to create data directory {}", config.data_dir.display())
        })?;

        let cache_path = config.cache_path();
        let storage = SqliteStorage::new(&cache_path.to_string_lossy())
            .with_context(|| format!("Failed to open cache at {}", cache_path.display()))?;
        let remote = HttpRemote::new(&config.api_url, config.request_timeout)?;

        Ok(Self::with_parts(config, Arc::new(storage), Arc::new(remote)))
    }

    pub fn with_parts(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteStore>,
    ) -> Self {
        let monitor =
            ConnectionMonitor::new(remote.clone(), config.health_interval, config.health_timeout);
        let store = SyncStore::new(remote, LocalCache::new(storage));
        AppContext { config, store, monitor }
    }

    /// One-time work before serving commands. A migration that cannot reach
    /// the remote is postponed to the next start.
    pub async fn startup(&self) {
        match migrate_legacy(&self.store).await {
            Ok(Some(count)) => println!("Migrated {} prompts from the old storage format", count),
            Ok(None) => {}
            Err(e) => warn!("Legacy migration postponed: {}", e),
        }
    }

    pub fn shutdown(&self) {
        self.monitor.stop();
    }
}
