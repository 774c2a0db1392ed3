use tracing::Level;

use super::error::SettingsError;
use crate::config::LoggingSettings;

/// Parses a log level name such as `info` or `WARN`.
pub fn parse_level(level: &str) -> Result<Level, SettingsError> {
    match level.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(SettingsError::InvalidLogLevel(level.to_string())),
    }
}

/// Initialize tracing/logging for the application.
///
/// Unknown levels fall back to `info`.
pub fn init(settings: &LoggingSettings) {
    let lvl = parse_level(&settings.level).unwrap_or(Level::INFO);

    // Use try_init so tests and libraries can call this multiple times without panicking
    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(settings.with_target)
        .try_init();
}
