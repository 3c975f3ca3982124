//! Configuration file support.
//!
//! Settings are read from a TOML file, with environment variable overrides
//! prefixed by `SPLUNK_SEARCH` and nested with `__`
//! (e.g. `SPLUNK_SEARCH__POLLING__MAX_ATTEMPTS=10`).
//!
//! # Configuration File Format
//!
//! ```toml
//! server = "https://splunk.example.com:8089"
//!
//! [endpoints]
//! login_path = "services/auth/login"
//! async_jobs_path = "services/search/jobs"
//! sync_jobs_path = "servicesNS/admin/search/search/jobs/export"
//!
//! [transport]
//! verify_tls = true
//! timeout_secs = 300
//!
//! [polling]
//! interval_ms = 500
//! max_attempts = 120
//! timeout_ms = 600000
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::ClientConfig;

/// File name searched for by [`find_config_file`]
const CONFIG_FILE_NAME: &str = "splunk-search.toml";

/// Load configuration from a file, applying environment overrides
pub fn load_config(path: &Path) -> Result<ClientConfig, config::ConfigError> {
    load_with_environment(path, environment())
}

/// `SPLUNK_SEARCH__<SECTION>__<KEY>` variables
fn environment() -> config::Environment {
    config::Environment::with_prefix("SPLUNK_SEARCH")
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(
    path: &Path,
    environment: config::Environment,
) -> Result<ClientConfig, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment)
        .build()?;

    settings.try_deserialize()
}

/// Save configuration to a TOML file
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new("."))
}

fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    let local = dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("splunk-search").join("config.toml");
    user.is_file().then_some(user)
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
