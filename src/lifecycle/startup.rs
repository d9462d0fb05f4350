//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve configuration from file, defaults and CLI overrides
//! - Load the record catalog before anything binds
//!
//! # Design Decisions
//! - Overrides are validated together with the file contents
//! - Catalog load failures abort startup

use std::path::Path;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

use crate::catalog::{CatalogError, RecordStore};
use crate::config::{load_config, validate_config, CatalogConfig, ConfigError, ServiceConfig};
use crate::net::ListenerError;

/// Anything that stops the service from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Load `path` (or defaults), apply `overrides`, and validate the result.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(port) = overrides.port {
        config.listener.port = port;
    }
    if let Some(level) = overrides.log_level {
        config.observability.log_level = level;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the record store from the configured source.
pub fn load_catalog(config: &CatalogConfig) -> Result<RecordStore, CatalogError> {
    let store = match &config.path {
        Some(path) => RecordStore::load(path)?,
        None => RecordStore::builtin(),
    };

    tracing::info!(
        records = store.len(),
        source = %config
            .path
            .as_deref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        "Catalog loaded"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let config = resolve_config(None, Overrides::default()).unwrap();
        assert_eq!(config.listener.port, 8080);
    }

    #[test]
    fn overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[listener]\nport = 9000\n").unwrap();

        let overrides = Overrides {
            port: Some(9100),
            log_level: Some("debug".to_string()),
        };
        let config = resolve_config(Some(file.path()), overrides).unwrap();
        assert_eq!(config.listener.port, 9100);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = Overrides {
            port: None,
            log_level: Some("chatty".to_string()),
        };
        assert!(matches!(
            resolve_config(None, overrides),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn builtin_catalog_by_default() {
        let store = load_catalog(&CatalogConfig::default()).unwrap();
        assert_eq!(store.len(), seed::BUILTIN.len());
    }

    #[test]
    fn missing_catalog_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            path: Some(dir.path().join("absent.json")),
        };
        assert!(matches!(load_catalog(&config), Err(CatalogError::Io(_))));
    }
}
