//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `API_RESPONSE_`, nested keys split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/api-response/config.toml
//! 4. System directory: /etc/api-response/config.toml
//! 5. Default values
//!
//! ```toml
//! log_level = "debug"
//!
//! [messages.not_found]
//! singular = ":attribute could not be found"
//! plural = ":attribute could not be found"
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::messages::MessageTemplates;

const APP_NAME: &str = "api-response";
const ENV_PREFIX: &str = "API_RESPONSE_";
const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter directive used by [`init_tracing`](crate::observability::init_tracing)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Templates for generated resource messages
    #[serde(default)]
    pub messages: MessageTemplates,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            messages: MessageTemplates::default(),
        }
    }
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Config files are merged lowest priority first, so a value in
    /// ./config.toml overrides the same value in the XDG or system file.
    /// Environment variables override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search path and loads directly from the given path.
    /// Environment variables still take precedence.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Find all possible config file paths
    ///
    /// Returns paths in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Some(path) = xdg_dirs.find_config_file(CONFIG_FILE) {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_NAME).join(CONFIG_FILE));
        paths
    }

    /// Get the recommended config path
    ///
    /// Returns: ~/.config/api-response/config.toml
    pub fn recommended_path() -> PathBuf {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);

        // place_config_file creates parent directories if needed
        xdg_dirs
            .place_config_file(CONFIG_FILE)
            .unwrap_or_else(|_| {
                PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| String::from("~")))
                    .join(".config")
                    .join(APP_NAME)
                    .join(CONFIG_FILE)
            })
    }

    /// Create the config directory if it doesn't exist and return it
    pub fn create_config_dir() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        let config_path = xdg_dirs.place_config_file(CONFIG_FILE)?;

        config_path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| {
                Error::Io(std::io::Error::other(format!(
                    "Invalid config path: {}",
                    config_path.display()
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.messages, MessageTemplates::default());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[messages.not_found]
singular = ":attribute could not be found"
plural = ":attribute could not be found"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.messages.not_found.singular,
            ":attribute could not be found"
        );
        assert_eq!(config.messages.created, MessageTemplates::default().created);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.messages, MessageTemplates::default());
    }

    #[test]
    fn test_load_from_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = [1, 2]").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_recommended_path_ends_with_config_file() {
        let path = Config::recommended_path();
        assert!(path.ends_with("api-response/config.toml"));
    }
}
