pub mod cli;
pub mod clipboard;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod sync;
pub mod ui;
pub mod utils;
pub mod version;

pub use config::Config;
pub use context::AppContext;
pub use error::{Result, VaultError};
pub use version::VERSION;
