use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for logging and for the registry itself.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub registry: RegistrySettings,
}

/// Configuration settings for logging.
///
/// `level` is one of `error`, `warn`, `info`, `debug` or `trace`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub with_target: bool,
}

/// Configuration settings for the registry.
///
/// `topic_capacity` is the number of topics preallocated in the topic map.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub topic_capacity: usize,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub logging: Option<PartialLoggingSettings>,
    pub registry: Option<PartialRegistrySettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
    pub with_target: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRegistrySettings {
    pub topic_capacity: Option<usize>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self { topic_capacity: 16 }
    }
}

impl PartialSettings {
    /// Fills every missing value from `Settings::default()`.
    pub fn merge_with_defaults(self) -> Settings {
        let default = Settings::default();
        let logging = self.logging;
        let registry = self.registry;

        Settings {
            logging: LoggingSettings {
                level: logging
                    .as_ref()
                    .and_then(|l| l.level.clone())
                    .unwrap_or(default.logging.level),
                with_target: logging
                    .as_ref()
                    .and_then(|l| l.with_target)
                    .unwrap_or(default.logging.with_target),
            },
            registry: RegistrySettings {
                topic_capacity: registry
                    .as_ref()
                    .and_then(|r| r.topic_capacity)
                    .unwrap_or(default.registry.topic_capacity),
            },
        }
    }
}
