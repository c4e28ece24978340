//! Tracing setup shared by every binary. Mirrors the original's
//! `slog`/`log/slog`-based `mustMakeLogger`: one text-formatted subscriber,
//! level driven by the service's configured `log_level`, writing to stderr.

use tracing_subscriber::EnvFilter;

/// Installs a process-global `tracing_subscriber::fmt` subscriber. `level`
/// is one of `DEBUG`/`INFO`/`ERROR` (case-insensitive); unrecognized values
/// panic, matching the original's `panic("unknown log level: " + logLevel)`.
pub fn init(level: &str) {
    let directive = match level.to_ascii_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" => "error",
        other => panic!("unknown log level: {other}"),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}
