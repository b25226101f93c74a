use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

use crate::utils::time::now_millis;

/// Maximum number of snapshots kept in a prompt's history.
pub const MAX_VERSIONS: usize = 5;

/// Version written into export envelopes.
pub const EXPORT_VERSION: u32 = 2;

/// The two collections the vault keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Prompts,
    Folders,
}

impl EntityKind {
    /// Storage key in the local cache; also the REST collection path.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Prompts => "prompts",
            Self::Folders => "folders",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Self::Prompts => "prompt",
            Self::Folders => "folder",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.singular())
    }
}

/// Something the sync layer can cache and push to the remote store.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Refresh modification bookkeeping before a save.
    fn touch(&mut self, _now: i64) {}
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_folder_name() -> String {
    "New Folder".to_string()
}

fn default_icon() -> String {
    "📁".to_string()
}

fn default_color() -> String {
    "#6366f1".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptVersion {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "now_millis")]
    pub saved_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default = "now_millis")]
    pub created_at: i64,
    #[serde(default = "now_millis")]
    pub updated_at: i64,
    #[serde(default)]
    pub versions: Vec<PromptVersion>,
}

impl Prompt {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now_millis();
        let title = title.into();
        Prompt {
            id: new_id(),
            title: if title.trim().is_empty() { default_title() } else { title },
            content: content.into(),
            tags: Vec::new(),
            is_favorite: false,
            is_pinned: false,
            folder_id: None,
            created_at: now,
            updated_at: now,
            versions: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.set_tags(tags);
        self
    }

    /// Tags are a set; drop blanks and repeats while keeping first-seen order.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        self.tags = unique;
    }

    /// Record the current title and content at the front of the history.
    pub fn push_version(&mut self, now: i64) -> &PromptVersion {
        self.versions.insert(
            0,
            PromptVersion {
                id: new_id(),
                title: self.title.clone(),
                content: self.content.clone(),
                saved_at: now,
            },
        );
        self.versions.truncate(MAX_VERSIONS);
        &self.versions[0]
    }

    pub fn find_version(&self, version_id: &str) -> Option<&PromptVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    /// Bring a pre-versioning record up to the current shape.
    pub fn upgrade_legacy(mut self) -> Self {
        self.is_pinned = false;
        self.folder_id = None;
        self.versions = Vec::new();
        self
    }
}

impl Entity for Prompt {
    const KIND: EntityKind = EntityKind::Prompts;

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: i64) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default = "default_folder_name")]
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "now_millis")]
    pub created_at: i64,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Folder {
            id: new_id(),
            name: if name.trim().is_empty() { default_folder_name() } else { name },
            icon: default_icon(),
            color: default_color(),
            created_at: now_millis(),
        }
    }
}

impl Entity for Folder {
    const KIND: EntityKind = EntityKind::Folders;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Versioned wrapper around exported data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: u32,
    pub exported_at: i64,
    pub prompts: Vec<Prompt>,
    pub folders: Vec<Folder>,
}

/// Order prompts for listing: pinned, then favorites, then most recently updated.
pub fn sort_for_display(prompts: &mut [Prompt]) {
    prompts.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.is_favorite.cmp(&a.is_favorite))
            .then(b.updated_at.cmp(&a.updated_at))
    });
}
