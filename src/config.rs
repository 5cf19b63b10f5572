//! Configuration management for benchex using the prefer crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::services::PageSize;

/// Default dataset file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data/datasets.csv";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// CSV file with the dataset metadata.
    pub data_file: PathBuf,
    /// Address the web server binds to.
    pub host: String,
    /// Port the web server listens on.
    pub port: u16,
    /// Rows per page when the request does not choose one.
    pub default_page_size: PageSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: "127.0.0.1".to_string(),
            port: 8501,
            default_page_size: PageSize::DEFAULT,
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to the dataset CSV. `~` is expanded.
    #[serde(default)]
    pub data_file: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// One of 10, 20, 50, 100; anything else is ignored.
    #[serde(default)]
    pub default_page_size: Option<usize>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers benchex config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("benchex").await {
            Ok(pref_config) => {
                let data_file: Option<String> = pref_config.get("data_file").ok();
                let host: Option<String> = pref_config.get("host").ok();
                let port: Option<u16> = pref_config.get("port").ok();
                let default_page_size: Option<usize> =
                    pref_config.get("default_page_size").ok();

                Config {
                    data_file,
                    host,
                    port,
                    default_page_size,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref data_file) = self.data_file {
            let path = shellexpand::tilde(data_file);
            settings.data_file = PathBuf::from(path.as_ref());
        }
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(size) = self.default_page_size {
            match PageSize::new(size) {
                Some(size) => settings.default_page_size = size,
                None => tracing::warn!(
                    "Ignoring default_page_size {}: must be one of 10, 20, 50, 100",
                    size
                ),
            }
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let config = Config {
            data_file: Some("/srv/bench/datasets.csv".to_string()),
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            default_page_size: Some(50),
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.data_file, PathBuf::from("/srv/bench/datasets.csv"));
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.default_page_size.get(), 50);
    }

    #[test]
    fn test_invalid_page_size_ignored() {
        let config = Config {
            default_page_size: Some(7),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        assert_eq!(settings.default_page_size, PageSize::DEFAULT);
    }
}
