use crate::errors::ShopperError;
use crate::search::SearchTransport;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-process transport replaying canned payloads and recording request URLs.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Result<Value, ShopperError>>>>,
    pub urls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Result<Value, ShopperError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<Value, ShopperError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ShopperError::InternalError("no canned reply left".into())))
    }
}
