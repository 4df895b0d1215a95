//! Application configuration management.
//!
//! Configuration is stored at `~/.config/blt-tui/config.json`. The API
//! base URL can be pinned in the config file, overridden with the
//! `BLT_API_URL` environment variable, or pointed at a local worker with
//! `BLT_LOCAL=1` - the native analog of the original hostname switch.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/storage directory paths
const APP_NAME: &str = "blt-tui";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Production API base URL.
const PRODUCTION_API_URL: &str = "https://api.owaspblt.org";

/// Local development worker URL.
const LOCAL_API_URL: &str = "http://localhost:8787";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pinned API base URL; takes precedence over env selection.
    pub api_base_url: Option<String>,
    /// Last email used to log in, pre-fills the login form.
    pub last_email: Option<String>,
    /// Declared for parity with the original configuration; nothing reads
    /// it yet.
    pub enable_analytics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            last_email: None,
            enable_analytics: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the API base URL: config value, then `BLT_API_URL`, then
    /// the local worker when `BLT_LOCAL=1`, then production.
    pub fn api_base_url(&self) -> String {
        if let Some(ref url) = self.api_base_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("BLT_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if std::env::var("BLT_LOCAL").map(|v| v == "1").unwrap_or(false) {
            return LOCAL_API_URL.to_string();
        }
        PRODUCTION_API_URL.to_string()
    }

    pub fn app_name() -> &'static str {
        APP_NAME
    }
}
