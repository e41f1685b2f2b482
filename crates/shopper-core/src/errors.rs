//! Error types for the shopping assistant core
//!
//! Every failure the dialogue can hit is a value, never a process abort. Errors
//! are grouped by where they come from (configuration, session lookup, the
//! downstream search service) so the HTTP layer can pick a status code without
//! string matching.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ShopperError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("No session found for: {0}")]
    SessionNotFound(String),
    #[error("Search request failed: {0}")]
    SearchTransport(String),
    #[error("Search request timed out after {0:?}")]
    SearchTimeout(Duration),
    #[error("Search service returned HTTP {status}")]
    SearchStatus { status: u16 },
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ShopperError {
    /// True for failures of the downstream search call, as opposed to local
    /// configuration or lookup problems.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            ShopperError::SearchTransport(_)
                | ShopperError::SearchTimeout(_)
                | ShopperError::SearchStatus { .. }
                | ShopperError::MalformedResponse(_)
        )
    }
}

impl From<std::io::Error> for ShopperError {
    fn from(err: std::io::Error) -> Self {
        ShopperError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for ShopperError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ShopperError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ShopperError::SearchStatus {
                status: status.as_u16(),
            }
        } else {
            ShopperError::SearchTransport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ShopperError {
    fn from(err: serde_json::Error) -> Self {
        ShopperError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_failure_classification() {
        assert!(ShopperError::SearchTimeout(Duration::from_secs(2)).is_gateway_failure());
        assert!(ShopperError::MalformedResponse("x".into()).is_gateway_failure());
        assert!(ShopperError::SearchStatus { status: 503 }.is_gateway_failure());
        assert!(!ShopperError::SessionNotFound("abc".into()).is_gateway_failure());
        assert!(!ShopperError::ConfigError("bad".into()).is_gateway_failure());
    }

    #[test]
    fn test_session_not_found_message() {
        let err = ShopperError::SessionNotFound("abc".into());
        assert_eq!(err.to_string(), "No session found for: abc");
    }
}
