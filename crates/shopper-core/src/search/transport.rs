//! HTTP transport for the item-search service.

use crate::errors::ShopperError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Fetches a search URL and returns the decoded JSON body.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, ShopperError>;
}

pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            timeout,
        }
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Value, ShopperError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "luxury-shopper/1.0")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        // The Finding API reports business failures inside a 200 JSON body but
        // uses 5xx for some failures too; keep a JSON body whatever the status.
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                if !status.is_success() {
                    log::warn!("Search service answered HTTP {} with a JSON body", status);
                }
                Ok(value)
            }
            Err(e) if status.is_success() => Err(ShopperError::MalformedResponse(format!(
                "search service returned non-JSON body: {}",
                e
            ))),
            Err(_) => Err(ShopperError::SearchStatus {
                status: status.as_u16(),
            }),
        }
    }
}

impl HttpTransport {
    fn map_error(&self, err: reqwest::Error) -> ShopperError {
        if err.is_timeout() {
            ShopperError::SearchTimeout(self.timeout)
        } else {
            ShopperError::from(err)
        }
    }
}
