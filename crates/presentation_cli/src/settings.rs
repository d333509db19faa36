//! Configuration loading for the CLI
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! `navitime.toml` (or the file given with `--config`), `NAVITIME_*`
//! environment variables, and finally command-line flags.

use std::path::Path;

use integration_navitime::NavitimeConfig;
use secrecy::SecretString;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_NAME: &str = "navitime";

/// Prefix of environment variables (e.g. `NAVITIME_API_KEY`)
pub const ENV_PREFIX: &str = "NAVITIME";

/// Load the configuration from file and environment
///
/// # Errors
///
/// Returns an error if an explicitly given file is missing, or a source
/// holds values of the wrong type.
pub fn load(file: Option<&Path>) -> Result<NavitimeConfig, config::ConfigError> {
    let file_source = match file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    config::Config::builder()
        .add_source(file_source)
        // Double underscore separates nesting so field names keep theirs
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// Values given on the command line, applied over the loaded configuration
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub search_window_minutes: Option<u32>,
    pub result_limit: Option<u32>,
}

impl Overrides {
    /// Apply every present override to `config`
    #[must_use]
    pub fn apply(self, mut config: NavitimeConfig) -> NavitimeConfig {
        if let Some(api_key) = self.api_key {
            config.api_key = SecretString::from(api_key);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(minutes) = self.search_window_minutes {
            config.search_window_minutes = minutes;
        }
        if let Some(limit) = self.result_limit {
            config.result_limit = limit;
        }
        config
    }
}
