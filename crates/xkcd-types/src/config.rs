//! Configuration loading helpers shared by every binary's `Config` type.
//!
//! Mirrors the precedence of the original system: read a YAML file when one
//! exists at the configured path, otherwise require every setting from the
//! process environment. There is no generic merge step — this is
//! deliberately the same two-branch `MustLoad` shape the original used, not
//! a layered config-source stack.

use std::path::Path;

use serde::de::DeserializeOwned;

/// Parses `path` as YAML into `T`. Panics with a descriptive message on any
/// failure, matching the original's `log.Fatalf`-on-bad-config behavior.
pub fn must_load_yaml_file<T: DeserializeOwned>(path: &Path) -> T {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read config file {}: {e}", path.display()));
    serde_yaml::from_str(&contents)
        .unwrap_or_else(|e| panic!("cannot parse config file {}: {e}", path.display()))
}

/// Reads a required environment variable, panicking with a descriptive
/// message if it is unset. Used for settings the original marked
/// `env-required:"true"`.
pub fn required_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("missing required environment variable {name}"))
}

/// Reads an environment variable, falling back to `default` if unset.
pub fn env_or(name: &str, default: impl Into<String>) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

/// Reads and parses an environment variable, falling back to `default` if
/// unset or unparsable.
pub fn env_or_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
