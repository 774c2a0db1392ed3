//! The `utils` module provides error types and logging setup shared across
//! the `pubreg` crate.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::error::SettingsError;
    use super::logging;
    use crate::config::LoggingSettings;
    use tracing::Level;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        for level in ["info", "debug", "warn", "bogus"] {
            logging::init(&LoggingSettings {
                level: level.to_string(),
                with_target: false,
            });
        }
    }

    #[test]
    fn parse_level_is_case_insensitive() {
        assert_eq!(logging::parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(logging::parse_level("warning").unwrap(), Level::WARN);
        assert_eq!(logging::parse_level("trace").unwrap(), Level::TRACE);
    }

    #[test]
    fn parse_level_rejects_unknown_names() {
        let err = logging::parse_level("loud").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidLogLevel(ref l) if l == "loud"));
        assert_eq!(err.to_string(), "unknown log level 'loud'");
    }
}
