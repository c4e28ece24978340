use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use xkcd_types::config::{env_or, env_or_parse, must_load_yaml_file, required_env};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_address")]
    pub address: String,
    pub ingester_address: String,
    pub searcher_address: String,
    pub words_address: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    pub admin_name: String,
    pub admin_password: String,
    pub jwt_secret: String,
    #[serde(with = "humantime_serde", default = "default_token_ttl")]
    pub token_ttl: Duration,

    #[serde(default = "default_concurrency_cap")]
    pub concurrency_cap: usize,
    #[serde(default = "default_rate_per_sec")]
    pub rate_per_sec: f64,
    #[serde(with = "humantime_serde", default = "default_rate_limit_wait")]
    pub rate_limit_wait: Duration,
}

fn default_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_token_ttl() -> Duration {
    Duration::from_secs(3600)
}

fn default_concurrency_cap() -> usize {
    64
}

fn default_rate_per_sec() -> f64 {
    50.0
}

fn default_rate_limit_wait() -> Duration {
    Duration::from_secs(5)
}

impl Config {
    /// Reads `path` as YAML if it exists, otherwise builds the config from
    /// the environment (`INGESTER_ADDRESS`, `SEARCHER_ADDRESS`,
    /// `WORDS_ADDRESS`, `ADMIN_NAME`, `ADMIN_PASSWORD`, `JWT_SECRET`
    /// required; the rest fall back to their defaults).
    pub fn must_load(path: Option<PathBuf>) -> Self {
        match path.filter(|p| p.exists()) {
            Some(path) => must_load_yaml_file(&path),
            None => {
                tracing::info!("config file not found, reading from environment");
                Config {
                    address: env_or("ADDRESS", default_address()),
                    ingester_address: required_env("INGESTER_ADDRESS"),
                    searcher_address: required_env("SEARCHER_ADDRESS"),
                    words_address: required_env("WORDS_ADDRESS"),
                    log_level: env_or("LOG_LEVEL", default_log_level()),
                    admin_name: required_env("ADMIN_NAME"),
                    admin_password: required_env("ADMIN_PASSWORD"),
                    jwt_secret: required_env("JWT_SECRET"),
                    token_ttl: Duration::from_secs(env_or_parse("TOKEN_TTL_SECS", 3600)),
                    concurrency_cap: env_or_parse("CONCURRENCY_CAP", default_concurrency_cap()),
                    rate_per_sec: env_or_parse("RATE_PER_SEC", default_rate_per_sec()),
                    rate_limit_wait: Duration::from_secs(env_or_parse("RATE_LIMIT_WAIT_SECS", 5)),
                }
            }
        }
    }
}
