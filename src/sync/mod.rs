pub mod migrate;
pub mod monitor;
pub mod remote;
pub mod store;

pub use migrate::{migrate_legacy, ImportData};
pub use monitor::{ConnectionMonitor, ConnectionStatus, Subscription};
pub use remote::{HealthReport, HttpRemote, ImportPayload, RemoteStore};
pub use store::SyncStore;
