mod settings;

use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};

use crate::config::settings::PartialSettings;
use crate::utils::error::SettingsError;
use crate::utils::logging;

pub use settings::{LoggingSettings, RegistrySettings, Settings};

/// Prefix of environment variables read by [`load_config`], e.g. `PUBREG_LOGGING__LEVEL`.
pub const ENV_PREFIX: &str = "PUBREG";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the logging and registry configurations
pub fn load_config() -> Result<Settings, SettingsError> {
    let builder = Config::builder().add_source(File::with_name("config/default").required(false));
    build(builder)
}

/// Same as [`load_config`] but reads the given file, which must exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let builder = Config::builder().add_source(File::from(path.as_ref()).required(true));
    build(builder)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings, SettingsError> {
    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;
    let settings = partial.merge_with_defaults();

    logging::parse_level(&settings.logging.level)?;
    Ok(settings)
}
