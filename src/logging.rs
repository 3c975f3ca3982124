//! Tracing subscriber setup.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the filter for `config`; `RUST_LOG` takes precedence when set
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("splunk_search={}", config.level)))
}

/// Whether `config` asks for JSON output
pub fn wants_json(config: &LoggingConfig) -> bool {
    config
        .format
        .as_deref()
        .is_some_and(|f| f.eq_ignore_ascii_case("json"))
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    if wants_json(config) {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_json() {
        let mut config = LoggingConfig::default();
        assert!(!wants_json(&config));

        config.format = Some("JSON".to_string());
        assert!(wants_json(&config));

        config.format = Some("pretty".to_string());
        assert!(!wants_json(&config));
    }

    #[test]
    fn test_init_logging_only_once() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: None,
        };

        // The first call may also fail if another test got there first
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
