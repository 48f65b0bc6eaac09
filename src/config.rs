//! Client settings loaded from a TOML file with environment overrides.
//!
//! Resolution order for the settings file: explicit `--config` path, the
//! `DOCSCAN_CONFIG` environment variable, then `docscan/config.toml` under
//! the platform config directory. A missing file yields defaults.
//! `DOCSCAN_BASE_URL` and `DOCSCAN_USER_ID` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Server connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the DocScanner API (e.g. `http://localhost:8000/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Synchronization timing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Quiet period after the last input change before a fetch, in ms.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Background poll interval while documents are processing, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    /// User identifier from the identity provider. Absent means signed out.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.sync.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sync.poll_interval_secs)
    }
}

/// Load settings, applying file discovery and environment overrides.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = resolve_config_path(config_path);

    let mut settings = match &path {
        Some(path) if path.exists() => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        _ => Settings::default(),
    };

    if let Ok(base_url) = std::env::var("DOCSCAN_BASE_URL") {
        settings.server.base_url = base_url;
    }
    if let Ok(user_id) = std::env::var("DOCSCAN_USER_ID") {
        if !user_id.is_empty() {
            settings.user_id = Some(user_id);
        }
    }

    Ok(settings)
}

/// Pick the settings file path without reading it.
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(expand_path(path));
    }
    if let Ok(path) = std::env::var("DOCSCAN_CONFIG") {
        return Some(expand_path(Path::new(&path)));
    }
    dirs::config_dir().map(|dir| dir.join("docscan").join("config.toml"))
}

/// Expand `~` in user-supplied paths.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
}
