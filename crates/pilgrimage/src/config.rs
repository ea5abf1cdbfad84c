//! Configuration management for pilgrimage.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identities;
use crate::localization::DEFAULT_LANGUAGE;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "pilgrimage";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PILGRIMAGE_`)
/// 2. TOML config file at `~/.config/pilgrimage/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notification timing.
    pub notifications: NotificationConfig,
    /// Language selection.
    pub localization: LocalizationConfig,
    /// Session start-up behaviour.
    pub session: SessionConfig,
}

/// Notification-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Backstop expiry of every notification, in milliseconds.
    pub auto_dismiss_ms: u64,
    /// Visual countdown before the display layer dismisses, in milliseconds.
    /// Must not exceed `auto_dismiss_ms`.
    pub display_dismiss_ms: u64,
}

/// Localization-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Initial language code. Unknown codes render in the default language.
    pub language: String,
}

/// Session-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Demo identity to sign in at start-up.
    pub auto_sign_in: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: 5_000,
            display_dismiss_ms: 4_000,
        }
    }
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading the TOML layer from
    /// `config_path` or the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PILGRIMAGE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let notifications = &self.notifications;
        if notifications.auto_dismiss_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "auto_dismiss_ms must be greater than 0".to_string(),
            });
        }

        if notifications.display_dismiss_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "display_dismiss_ms must be greater than 0".to_string(),
            });
        }

        if notifications.display_dismiss_ms > notifications.auto_dismiss_ms {
            return Err(Error::ConfigValidation {
                message: format!(
                    "display_dismiss_ms ({}) cannot be greater than auto_dismiss_ms ({})",
                    notifications.display_dismiss_ms, notifications.auto_dismiss_ms
                ),
            });
        }

        if let Some(id) = &self.session.auto_sign_in {
            if identities::find(id).is_none() {
                return Err(Error::ConfigValidation {
                    message: format!("auto_sign_in names unknown demo identity: {id}"),
                });
            }
        }

        Ok(())
    }

    /// Get the notification expiry as a Duration.
    #[must_use]
    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_millis(self.notifications.auto_dismiss_ms)
    }

    /// Get the display countdown as a Duration.
    #[must_use]
    pub fn display_dismiss(&self) -> Duration {
        Duration::from_millis(self.notifications.display_dismiss_ms)
    }
}
