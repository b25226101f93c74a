use log::{info, warn};
use serde_json::Value;

use super::store::SyncStore;
use crate::db::models::EXPORT_VERSION;
use crate::db::{Folder, Prompt};
use crate::error::{Result, VaultError};

/// Storage key holding the pre-versioning prompt array.
pub const LEGACY_PROMPTS_KEY: &str = "prompts_v1";

/// Where the raw legacy value is kept once migrated.
pub const LEGACY_BACKUP_KEY: &str = "prompts_v1_backup";

/// Prompts and folders read from an export file or legacy storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportData {
    pub prompts: Vec<Prompt>,
    pub folders: Vec<Folder>,
    /// True when the input was a pre-v2 form and was upgraded.
    pub upgraded: bool,
}

impl ImportData {
    /// Accepts a v2 envelope, a bare array of v1 prompts, or an envelope
    /// with `version < 2`. Legacy prompts get `isPinned=false`,
    /// `folderId=null` and an empty history.
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| VaultError::InvalidImport(format!("not valid JSON: {}", e)))?;

        match value {
            Value::Array(_) => {
                let prompts = decode::<Prompt>(value, "prompts")?;
                Ok(Self::legacy(prompts, Vec::new()))
            }
            Value::Object(mut map) => {
                let version = map.get("version").and_then(Value::as_u64).unwrap_or(1);
                let prompts = match map.remove("prompts") {
                    Some(v) => decode::<Prompt>(v, "prompts")?,
                    None => Vec::new(),
                };
                let folders = match map.remove("folders") {
                    Some(v) => decode::<Folder>(v, "folders")?,
                    None => Vec::new(),
                };
                if version < u64::from(EXPORT_VERSION) {
                    Ok(Self::legacy(prompts, folders))
                } else {
                    Ok(Self { prompts, folders, upgraded: false })
                }
            }
            _ => Err(VaultError::InvalidImport(
                "expected an export envelope or an array of prompts".to_string(),
            )),
        }
    }

    fn legacy(prompts: Vec<Prompt>, folders: Vec<Folder>) -> Self {
        Self {
            prompts: prompts.into_iter().map(Prompt::upgrade_legacy).collect(),
            folders,
            upgraded: true,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, field: &str) -> Result<Vec<T>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value)
        .map_err(|e| VaultError::InvalidImport(format!("bad {}: {}", field, e)))
}

/// Import prompts left in the legacy storage key, then retire the key.
///
/// Returns the number of prompts migrated, or `None` when there was nothing
/// to do. A failed import leaves the key in place for the next start.
pub async fn migrate_legacy(store: &SyncStore) -> Result<Option<usize>> {
    let cache = store.cache();
    let Some(raw) = cache.read_raw(LEGACY_PROMPTS_KEY) else {
        return Ok(None);
    };

    let data = match ImportData::parse(&raw) {
        Ok(data) => data,
        Err(e) => {
            warn!("Skipping legacy migration, stored data is unreadable: {}", e);
            return Ok(None);
        }
    };

    // Legacy storage only ever held the old format.
    let data = if data.upgraded { data } else { ImportData::legacy(data.prompts, data.folders) };
    let count = data.prompts.len();
    store.import(data.prompts, data.folders).await?;

    if cache.write_raw(LEGACY_BACKUP_KEY, &raw) {
        cache.remove_raw(LEGACY_PROMPTS_KEY);
    } else {
        warn!("Could not back up legacy prompts, keeping {} for the next start", LEGACY_PROMPTS_KEY);
    }
    info!("Migrated {} legacy prompts", count);
    Ok(Some(count))
}
