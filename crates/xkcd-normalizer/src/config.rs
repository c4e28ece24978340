use std::path::PathBuf;

use serde::Deserialize;
use xkcd_types::config::{env_or, must_load_yaml_file};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_address() -> String {
    "0.0.0.0:8083".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Reads `path` as YAML if it exists, otherwise builds the config from
    /// the environment (`WORDS_ADDRESS`, `LOG_LEVEL`), matching the
    /// original's `MustLoad` precedence.
    pub fn must_load(path: Option<PathBuf>) -> Self {
        match path.filter(|p| p.exists()) {
            Some(path) => must_load_yaml_file(&path),
            None => {
                tracing::info!("config file not found, reading from environment");
                Config {
                    address: env_or("WORDS_ADDRESS", default_address()),
                    log_level: env_or("LOG_LEVEL", default_log_level()),
                }
            }
        }
    }
}
