//! Translation of filled slots into a Finding API `findItemsByKeywords` query.

use crate::session::{Session, Slot};

const OPERATION_NAME: &str = "findItemsByKeywords";
const SERVICE_VERSION: &str = "1.0.0";
const RESPONSE_FORMAT: &str = "JSON";

/// Reserved answers meaning "do not filter on this slot".
pub const NO_FILTER_SENTINELS: [&str; 2] = ["none", "all"];

/// Case-insensitive check for a no-filter sentinel.
pub fn is_no_filter(value: &str) -> bool {
    let value = value.trim();
    NO_FILTER_SENTINELS
        .iter()
        .any(|sentinel| value.eq_ignore_ascii_case(sentinel))
}

/// Completed search criteria, taken from a session that reached dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub keyword: String,
    pub condition: String,
    pub min_price: String,
    pub max_price: String,
}

impl SearchCriteria {
    /// Returns `None` unless every slot has been filled.
    pub fn from_session(session: &Session) -> Option<Self> {
        Some(Self {
            keyword: session.search_by_keyword.clone()?,
            condition: session.condition.clone()?,
            min_price: session.min_price.clone()?,
            max_price: session.max_price.clone()?,
        })
    }

    pub fn value(&self, slot: Slot) -> &str {
        match slot {
            Slot::Condition => &self.condition,
            Slot::MinPrice => &self.min_price,
            Slot::MaxPrice => &self.max_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    pub index: usize,
    pub name: &'static str,
    pub value: String,
}

/// A ready-to-send query. Filters are numbered from zero with no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub entries_per_page: usize,
    pub filters: Vec<ItemFilter>,
}

impl SearchQuery {
    pub fn build(criteria: &SearchCriteria, entries_per_page: usize) -> Self {
        let mut filters = Vec::new();
        for slot in Slot::ORDERED {
            let value = criteria.value(slot).trim();
            if is_no_filter(value) {
                continue;
            }
            filters.push(ItemFilter {
                index: filters.len(),
                name: slot.filter_name(),
                value: value.to_string(),
            });
        }

        Self {
            keyword: criteria.keyword.clone(),
            entries_per_page,
            filters,
        }
    }

    pub fn encoded_keyword(&self) -> String {
        urlencoding::encode(&self.keyword).into_owned()
    }

    /// Full request URL against `endpoint`.
    pub fn to_url(&self, endpoint: &str, app_id: &str) -> String {
        let mut url = format!(
            "{}?OPERATION-NAME={}&SERVICE-VERSION={}&SECURITY-APPNAME={}&RESPONSE-DATA-FORMAT={}&REST-PAYLOAD&paginationInput.entriesPerPage={}&keywords={}",
            endpoint.trim_end_matches('?'),
            OPERATION_NAME,
            SERVICE_VERSION,
            urlencoding::encode(app_id),
            RESPONSE_FORMAT,
            self.entries_per_page,
            self.encoded_keyword(),
        );

        for filter in &self.filters {
            url.push_str(&format!(
                "&itemFilter({i}).name={}&itemFilter({i}).value={}",
                filter.name,
                urlencoding::encode(&filter.value),
                i = filter.index,
            ));
        }

        url
    }
}
