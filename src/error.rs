use thiserror::Error;

/// Errors raised by the storage, cache and sync layers.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("remote returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: String, id: String },

    #[error("invalid import data: {0}")]
    InvalidImport(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl VaultError {
    /// Whether the error came from the remote side (transport or non-2xx).
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Http(_))
    }
}
