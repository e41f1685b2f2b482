//! Configuration type definitions for the shopping assistant
//!
//! Every section carries defaults, so an empty YAML document (or no file at
//! all) produces a configuration that talks to the public Finding endpoint
//! asking for five results with a two-second timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_FINDING_ENDPOINT: &str =
    "http://svcs.ebay.com/services/search/FindingService/v1";
pub const DEFAULT_APP_ID_ENV: &str = "EBAY_APP_ID";
pub const MAX_ENTRIES_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopperConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub dialogue: DialogueSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_true")]
    pub enable_cors: bool,
    /// Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    #[serde(default = "default_true")]
    pub enable_logging: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_cors: true,
            cors_origins: Vec::new(),
            max_body_size: default_max_body_size(),
            enable_logging: true,
        }
    }
}

/// Settings for the downstream item-search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Application id sent as `SECURITY-APPNAME`.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Environment variable consulted when `app_id` is not set inline.
    #[serde(default = "default_app_id_env")]
    pub app_id_env: Option<String>,
    #[serde(default = "default_results_per_search")]
    pub results_per_search: usize,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Requested page size, clamped to what the Finding API accepts.
    pub fn entries_per_page(&self) -> usize {
        self.results_per_search.clamp(1, MAX_ENTRIES_PER_PAGE)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            app_id: None,
            app_id_env: default_app_id_env(),
            results_per_search: default_results_per_search(),
            timeout_secs: default_search_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueSettings {
    /// Reject condition answers other than New, Used or a no-filter sentinel
    /// and ask again. When false, unrecognized answers mean "no filter".
    #[serde(default = "default_true")]
    pub strict_condition: bool,
    /// Attach the session slot state to question replies.
    #[serde(default = "default_true")]
    pub expose_session_state: bool,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            strict_condition: true,
            expose_session_state: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Sessions idle longer than this are dropped. `None` keeps them forever.
    #[serde(default)]
    pub idle_ttl_secs: Option<u64>,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl SessionSettings {
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_ttl_secs: None,
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_body_size() -> usize {
    64 * 1024
}

fn default_endpoint() -> String {
    DEFAULT_FINDING_ENDPOINT.to_string()
}

fn default_app_id_env() -> Option<String> {
    Some(DEFAULT_APP_ID_ENV.to_string())
}

fn default_results_per_search() -> usize {
    5
}

fn default_search_timeout() -> u64 {
    2
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}
