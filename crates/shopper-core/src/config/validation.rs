//! Sanity checks applied after a configuration has been loaded and resolved.

use crate::config::types::*;
use crate::errors::ShopperError;
use std::net::SocketAddr;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl ShopperConfig {
    pub fn validate(&self) -> Result<(), ShopperError> {
        self.server
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| {
                ShopperError::ConfigError(format!(
                    "Invalid bind address '{}': {}",
                    self.server.bind_addr, e
                ))
            })?;

        if self.server.max_body_size == 0 {
            return Err(ShopperError::ConfigError(
                "Server max_body_size must be greater than 0".to_string(),
            ));
        }

        let endpoint = self.search.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ShopperError::ConfigError(format!(
                "Search endpoint must be an http(s) URL, got '{}'",
                self.search.endpoint
            )));
        }

        let results = self.search.results_per_search;
        if results == 0 || results > MAX_ENTRIES_PER_PAGE {
            return Err(ShopperError::ConfigError(format!(
                "Search results_per_search must be between 1 and {}",
                MAX_ENTRIES_PER_PAGE
            )));
        }

        if self.search.timeout_secs == 0 {
            return Err(ShopperError::ConfigError(
                "Search timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.session.idle_ttl_secs == Some(0) {
            return Err(ShopperError::ConfigError(
                "Session idle_ttl_secs must be greater than 0 when set".to_string(),
            ));
        }

        if self.session.sweep_interval_secs == 0 {
            return Err(ShopperError::ConfigError(
                "Session sweep_interval_secs must be greater than 0".to_string(),
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ShopperError::ConfigError(format!(
                "Unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.search.app_id.as_deref().map_or(true, str::is_empty) {
            log::warn!(
                "No search app id configured; searches will be rejected until one is set"
            );
        }

        Ok(())
    }
}
