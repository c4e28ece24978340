use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use xkcd_types::config::{env_or, env_or_parse, must_load_yaml_file, required_env};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_address")]
    pub address: String,
    pub db_address: String,
    pub words_address: String,
    #[serde(default = "default_broker_address")]
    pub broker_address: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(with = "humantime_serde", default = "default_rebuild_interval")]
    pub rebuild_interval: Duration,
}

fn default_address() -> String {
    "0.0.0.0:8082".to_string()
}

fn default_broker_address() -> String {
    "nats://nats:4222".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_rebuild_interval() -> Duration {
    Duration::from_secs(300)
}

impl Config {
    /// Reads `path` as YAML if it exists, otherwise builds the config from
    /// the environment (`DB_ADDRESS`, `WORDS_ADDRESS` required; the rest
    /// fall back to their defaults).
    pub fn must_load(path: Option<PathBuf>) -> Self {
        match path.filter(|p| p.exists()) {
            Some(path) => must_load_yaml_file(&path),
            None => {
                tracing::info!("config file not found, reading from environment");
                Config {
                    address: env_or("ADDRESS", default_address()),
                    db_address: required_env("DB_ADDRESS"),
                    words_address: required_env("WORDS_ADDRESS"),
                    broker_address: env_or("BROKER_ADDRESS", default_broker_address()),
                    log_level: env_or("LOG_LEVEL", default_log_level()),
                    rebuild_interval: Duration::from_secs(env_or_parse("REBUILD_INTERVAL_SECS", 300)),
                }
            }
        }
    }
}
