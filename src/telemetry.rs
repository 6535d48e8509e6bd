//! Logging setup for the command line tool and server.

use tracing_subscriber::EnvFilter;

use crate::error::{EngineError, EngineResult};

/// Installs a compact `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used as the filter.
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSetting`] for an unparseable filter and
/// [`EngineError::ServerError`] if a subscriber is already installed.
pub fn init(default_level: &str) -> EngineResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(default_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| EngineError::ServerError {
            message: format!("failed to install log subscriber: {}", e),
        })
}

fn build_filter(level: &str) -> EngineResult<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| EngineError::InvalidSetting {
        name: "APP_LOG_LEVEL".to_string(),
        message: format!("'{}' is not a valid log filter: {}", level, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_levels_and_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("expense_policy=debug,warn").is_ok());
    }

    #[test]
    fn test_rejects_garbage_filter() {
        match build_filter("expense_policy=loudest") {
            Err(EngineError::InvalidSetting { name, .. }) => assert_eq!(name, "APP_LOG_LEVEL"),
            other => panic!("Expected InvalidSetting, got {:?}", other),
        }
    }
}
