//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Initialize JSON tracing output filtered by `config.log_level`
///
/// An unparseable filter falls back to `info`. Calling this twice keeps the
/// first subscriber.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(log_level = %config.log_level, "Tracing initialized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        let config = Config {
            log_level: "not a valid [filter".to_string(),
            ..Config::default()
        };
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&Config::default()).is_ok());
    }
}
