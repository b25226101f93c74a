pub mod cache;
pub mod models;
pub mod store;

pub use cache::LocalCache;
pub use models::{Entity, EntityKind, ExportEnvelope, Folder, Prompt, PromptVersion};
pub use store::{KeyValueStore, MemoryStorage, SqliteStorage};
