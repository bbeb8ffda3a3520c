use super::AppConfig;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from a TOML file, falling back to defaults if the
/// file is missing or malformed.
pub fn load_config(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), "Invalid config TOML, using defaults: {err}");
                AppConfig::default()
            }
        },
        Err(err) => {
            warn!(path = %path.display(), "No config file, using defaults: {err}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

pub fn serialize_config(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string(config)
}
