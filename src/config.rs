// Application configuration.
// Merges built-in defaults, an optional config.json, and POSTDECK_* environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::paths;
use crate::error::{PostdeckError, Result};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub page_limit: u32,
    pub debounce_ms: u64,
    /// Session store file; `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
}

/// On-disk config, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
struct ConfigFile {
    base_url: Option<String>,
    page_limit: Option<u32>,
    debounce_ms: Option<u64>,
    session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            session_file: paths::session_path(),
        }
    }
}

impl Config {
    /// Load config from the user config file and process environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = paths::config_path() {
            config.apply_file(&path)?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&contents)?;

        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(page_limit) = file.page_limit {
            self.page_limit = page_limit;
        }
        if let Some(debounce_ms) = file.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if let Some(session_file) = file.session_file {
            self.session_file = Some(session_file);
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base_url) = var("POSTDECK_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(limit) = var("POSTDECK_PAGE_LIMIT") {
            self.page_limit = limit.trim().parse().map_err(|_| {
                PostdeckError::Config(format!("POSTDECK_PAGE_LIMIT is not a number: {}", limit))
            })?;
        }
        if let Some(ms) = var("POSTDECK_DEBOUNCE_MS") {
            self.debounce_ms = ms.trim().parse().map_err(|_| {
                PostdeckError::Config(format!("POSTDECK_DEBOUNCE_MS is not a number: {}", ms))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            return Err(PostdeckError::Config(
                "page_limit must be positive".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(PostdeckError::Config("base_url is empty".to_string()));
        }
        Ok(())
    }
}
