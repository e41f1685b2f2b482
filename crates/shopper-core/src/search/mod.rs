//! Search gateway: filled slots in, classified search outcome out.
//!
//! The gateway owns the only knowledge of the external Finding API. It builds
//! the keyword query, sends it through a [`SearchTransport`] bounded by the
//! configured timeout and classifies the payload into a [`SearchOutcome`].
//! Transport, timeout and parse failures come back as errors for the current
//! turn only.

pub mod query;
pub mod response;
pub mod transport;

pub use query::{is_no_filter, ItemFilter, SearchCriteria, SearchQuery, NO_FILTER_SENTINELS};
pub use response::{FetchedItem, SearchOutcome};
pub use transport::{HttpTransport, SearchTransport};

use crate::config::SearchSettings;
use crate::errors::ShopperError;
use std::sync::Arc;

#[derive(Clone)]
pub struct SearchGateway {
    transport: Arc<dyn SearchTransport>,
    settings: SearchSettings,
}

impl SearchGateway {
    pub fn new(transport: Arc<dyn SearchTransport>, settings: SearchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Gateway over HTTP using the configured timeout.
    pub fn http(settings: SearchSettings) -> Self {
        let transport = HttpTransport::new(settings.timeout());
        Self::new(Arc::new(transport), settings)
    }

    /// Number of results asked for per search.
    pub fn requested_results(&self) -> usize {
        self.settings.entries_per_page()
    }

    pub fn build_query(&self, criteria: &SearchCriteria) -> SearchQuery {
        SearchQuery::build(criteria, self.requested_results())
    }

    pub fn request_url(&self, query: &SearchQuery) -> String {
        query.to_url(
            &self.settings.endpoint,
            self.settings.app_id.as_deref().unwrap_or_default(),
        )
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome, ShopperError> {
        let query = self.build_query(criteria);
        let url = self.request_url(&query);

        log::info!(
            "Searching for '{}' with {} filter(s), {} result(s) requested",
            query.keyword,
            query.filters.len(),
            query.entries_per_page
        );
        log::debug!("Search URL: {}", url);

        let payload = self.transport.fetch(&url).await.map_err(|e| {
            log::error!("Search request for '{}' failed: {}", query.keyword, e);
            e
        })?;

        let outcome = SearchOutcome::from_payload(&payload)?;
        match &outcome {
            SearchOutcome::Failure { message } => {
                log::warn!("Search service reported failure: {}", message)
            }
            SearchOutcome::NoResults => log::info!("No items found for '{}'", query.keyword),
            SearchOutcome::Items { count, items, .. } => log::info!(
                "Search for '{}' matched {} item(s), {} row(s) returned",
                query.keyword,
                count,
                items.len()
            ),
        }

        Ok(outcome)
    }
}
