//! Configuration loader for YAML files and environment resolution
//!
//! This module handles loading configuration from YAML files and resolving
//! values that may come from the process environment.

use crate::config::types::*;
use crate::errors::ShopperError;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use tokio::fs;

/// Environment variable that overrides the port of the bind address.
pub const PORT_ENV: &str = "PORT";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ShopperConfig, ShopperError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            ShopperError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load the file when it exists, otherwise fall back to defaults.
    pub async fn from_file_or_default<P: AsRef<Path>>(
        path: P,
    ) -> Result<ShopperConfig, ShopperError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            log::info!("Loading configuration from file: {}", path.display());
            Self::from_file(path).await
        } else {
            log::info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Self::from_defaults()
        }
    }

    /// Build the default configuration and resolve it against the environment.
    pub fn from_defaults() -> Result<ShopperConfig, ShopperError> {
        let mut config = ShopperConfig::default();
        Self::resolve_environment(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<ShopperConfig, ShopperError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let mut config: ShopperConfig = if content.trim().is_empty() {
            ShopperConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                ShopperError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::resolve_environment(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Resolve environment variables in the configuration
    fn resolve_environment(config: &mut ShopperConfig) -> Result<(), ShopperError> {
        Self::resolve_search_auth(&mut config.search);
        Self::resolve_port(&mut config.server)?;
        Ok(())
    }

    fn resolve_search_auth(search: &mut SearchSettings) {
        if search.app_id.as_deref().is_some_and(|id| !id.is_empty()) {
            return;
        }

        if let Some(env_var) = &search.app_id_env {
            if let Ok(app_id) = env::var(env_var) {
                if !app_id.trim().is_empty() {
                    log::debug!("Resolved search app id from ${}", env_var);
                    search.app_id = Some(app_id.trim().to_string());
                }
            }
        }
    }

    fn resolve_port(server: &mut ServerSettings) -> Result<(), ShopperError> {
        let port = match env::var(PORT_ENV) {
            Ok(port) if !port.trim().is_empty() => port,
            _ => return Ok(()),
        };

        let port: u16 = port.trim().parse().map_err(|e| {
            ShopperError::ConfigError(format!("Invalid {} value '{}': {}", PORT_ENV, port, e))
        })?;

        let mut addr: SocketAddr = server.bind_addr.parse().map_err(|e| {
            ShopperError::ConfigError(format!(
                "Invalid bind address '{}': {}",
                server.bind_addr, e
            ))
        })?;
        addr.set_port(port);
        server.bind_addr = addr.to_string();
        log::debug!("Bind address set to {} from ${}", server.bind_addr, PORT_ENV);

        Ok(())
    }
}
