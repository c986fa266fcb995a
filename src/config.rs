use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::infra::poll::DEFAULT_POLL_INTERVAL;

/// Base URL of a locally hosted marketplace API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "ToolShare";
const APP_NAME: &str = "ToolShareClient";

/// Client settings, loadable from `config.json` in the platform config dir.
/// Unknown keys are ignored and missing keys fall back to the defaults, so a
/// hand-edited partial file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    /// Page size sent for paginated requests.
    pub per_page: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            per_page: 20,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Loads the saved configuration, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_config() -> ClientConfig {
    config_file()
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|data| serde_json::from_str(&data).ok())
        .unwrap_or_default()
}

pub fn save_config(config: &ClientConfig) -> Result<(), ConfigSaveError> {
    let path = config_file().ok_or(ConfigSaveError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_api() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.per_page, 20);
    }

    #[test]
    fn poll_interval_default_tracks_the_poller() {
        assert_eq!(
            ClientConfig::default().poll_interval(),
            DEFAULT_POLL_INTERVAL
        );
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn partial_file_keeps_the_other_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"per_page": 50, "base_url": "https://rent.example/api/"}"#)
                .unwrap();
        assert_eq!(config.per_page, 50);
        assert_eq!(config.base_url, "https://rent.example/api/");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
