use log::warn;
use std::{path::PathBuf, time::Duration};

pub const API_URL_ENV: &str = "PROMPT_VAULT_API_URL";
pub const HOME_ENV: &str = "PROMPT_VAULT_HOME";
pub const HEALTH_INTERVAL_ENV: &str = "PROMPT_VAULT_HEALTH_INTERVAL_SECS";
pub const TIMEOUT_ENV: &str = "PROMPT_VAULT_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub health_interval: Duration,
    pub health_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            health_interval: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Defaults overridden by whatever `PROMPT_VAULT_*` variables are set.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }
        if let Some(dir) = std::env::var_os(HOME_ENV) {
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        if let Some(secs) = secs_from_env(HEALTH_INTERVAL_ENV) {
            config.health_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = secs_from_env(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(secs);
        }

        config
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("cache.db")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|mut path| {
            path.push(".prompt-vault");
            path
        })
        .unwrap_or_else(|| PathBuf::from(".prompt-vault"))
}

fn secs_from_env(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!("Ignoring {}={:?}, expected a positive number of seconds", name, raw);
            None
        }
    }
}
