// ABOUTME: Configuration management for gigboard
// Handles the config file, API endpoint settings and credential storage selection

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable that relocates the gigboard home directory
pub const HOME_ENV: &str = "GIGBOARD_HOME";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "GIGBOARD_API_URL";

/// Environment variable that selects the credential storage (keyring or file)
pub const CREDENTIALS_ENV: &str = "GIGBOARD_CREDENTIALS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Marketplace API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the session token is persisted
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the marketplace REST API, e.g. http://localhost:8000/api
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Storage used for the session token
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStorage {
    /// System keychain (macOS Keychain, Linux Secret Service)
    #[default]
    Keyring,
    /// Plain file under the gigboard home directory
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialConfig {
    #[serde(default)]
    pub storage: CredentialStorage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiPreferences {
    /// Event loop tick in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Whether to mask passwords while typing
    #[serde(default = "default_true")]
    pub mask_passwords: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            mask_passwords: default_true(),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("gigboard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_tick_rate_ms() -> u64 {
    250
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            credentials: CredentialConfig::default(),
            ui_preferences: UiPreferences::default(),
        }
    }
}

/// Resolve the gigboard home directory ($GIGBOARD_HOME or ~/.gigboard)
pub fn gigboard_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let home_dir = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home_dir.join(".gigboard"))
}

impl AppConfig {
    /// Load configuration from default locations, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Later paths take precedence
        for path in Self::get_config_paths() {
            if path.exists() {
                config = Self::load_from_path(&path)?;
                debug!("Loaded config from {}", path.display());
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load a single config file without env overrides
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::get_user_config_dir()?;
        fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(config_path)
    }

    /// Get configuration file paths in order of precedence (lowest first)
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. User config (~/.gigboard/config/config.toml)
        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        // 2. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".gigboard").join("config.toml"));
        }

        paths
    }

    fn get_user_config_dir() -> Result<PathBuf> {
        Ok(gigboard_home()?.join("config"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        if let Ok(storage) = std::env::var(CREDENTIALS_ENV) {
            match storage.trim().to_ascii_lowercase().as_str() {
                "file" => self.credentials.storage = CredentialStorage::File,
                "keyring" => self.credentials.storage = CredentialStorage::Keyring,
                other => warn!("Ignoring unknown {} value: {}", CREDENTIALS_ENV, other),
            }
        }
    }

    /// Check that the configured base URL is usable
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must use http or https: {}", self.api.base_url);
        }
        Ok(())
    }
}
