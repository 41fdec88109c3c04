pub use crate::error_classifier::LogLevel;
use std::env;

pub fn get_rust_log_level() -> LogLevel {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    parse_rust_log_level(&rust_log)
}

pub fn parse_rust_log_level(rust_log: &str) -> LogLevel {
    // Handle common RUST_LOG formats
    let level_str = rust_log
        .split(',')
        .next()
        .unwrap_or(rust_log)
        .split('=')
        .next_back()
        .unwrap_or(rust_log)
        .to_lowercase();

    match level_str.as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info, // Default to info if parsing fails
    }
}

/// Installs the `env_logger` backend for the `log` facade.
///
/// `verbose` forces debug output regardless of `RUST_LOG`. Logs go to stderr
/// so rendered fragments on stdout stay clean.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LogLevel::Debug
    } else {
        get_rust_log_level()
    };
    let _ = env_logger::Builder::new()
        .filter_level(level.into())
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr)
        .try_init();
}
