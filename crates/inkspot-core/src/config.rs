use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{InkspotError, Result};

/// Top-level configuration for the Ink Spot application.
///
/// Loaded from `~/.inkspot/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InkspotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl InkspotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: InkspotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| InkspotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Default config file path for the current platform (`~/.inkspot/config.toml`).
pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".inkspot").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".inkspot").join("config.toml");
    }
    PathBuf::from("config.toml")
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chat widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Minimum simulated typing delay before a bot reply, in milliseconds.
    pub reply_delay_base_ms: u64,
    /// Upper bound (exclusive) of the random extra delay added to the base.
    pub reply_delay_jitter_ms: u64,
    /// Greeting posted by the bot when the widget is created.
    pub welcome_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_base_ms: 800,
            reply_delay_jitter_ms: 600,
            welcome_message: "Hi there! Welcome to The Ink Spot. How can I help you today?"
                .to_string(),
        }
    }
}

impl ChatConfig {
    /// Reject settings the chat widget cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.welcome_message.trim().is_empty() {
            return Err(InkspotError::Config(
                "chat.welcome_message must not be empty".to_string(),
            ));
        }
        if self
            .reply_delay_base_ms
            .checked_add(self.reply_delay_jitter_ms)
            .is_none()
        {
            return Err(InkspotError::Config(
                "chat reply delay overflows".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mock backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address the mock API server binds to.
    pub bind_address: String,
    /// Mock API server port.
    pub port: u16,
    /// Whether endpoints sleep to imitate network latency.
    pub simulate_latency: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3030,
            simulate_latency: true,
        }
    }
}
