//! Per-conversation slot state and the store that owns it.
//!
//! A [`Session`] is the typed record of what the user has told us so far. Its
//! JSON form keeps the wire keys the chat client expects (`searchByKeyword`, `conditionBool`,
//! ...) because question replies can mirror it back to the client.

pub mod store;

pub use store::{generate_session_id, SessionHandle, SessionStore, StoreStats};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Criteria slots filled by question/answer turns, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Condition,
    MinPrice,
    MaxPrice,
}

impl Slot {
    pub const ORDERED: [Slot; 3] = [Slot::Condition, Slot::MinPrice, Slot::MaxPrice];

    /// Wire key of the slot value.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Condition => "condition",
            Slot::MinPrice => "minPrice",
            Slot::MaxPrice => "maxPrice",
        }
    }

    /// Name of the downstream item filter the slot maps to.
    pub fn filter_name(self) -> &'static str {
        match self {
            Slot::Condition => "Condition",
            Slot::MinPrice => "MinPrice",
            Slot::MaxPrice => "MaxPrice",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Slot values and "question asked" markers for one conversation.
///
/// Markers are tri-state: `None` until the engine first visits the slot,
/// `Some(false)` while the question is pending emission and `Some(true)` once
/// it has been asked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_by_keyword: Option<String>,
    #[serde(default, rename = "conditionBool", skip_serializing_if = "Option::is_none")]
    pub condition_asked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, rename = "minPriceBool", skip_serializing_if = "Option::is_none")]
    pub min_price_asked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, rename = "maxPriceBool", skip_serializing_if = "Option::is_none")]
    pub max_price_asked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, slot: Slot) -> Option<bool> {
        match slot {
            Slot::Condition => self.condition_asked,
            Slot::MinPrice => self.min_price_asked,
            Slot::MaxPrice => self.max_price_asked,
        }
    }

    pub fn marker_mut(&mut self, slot: Slot) -> &mut Option<bool> {
        match slot {
            Slot::Condition => &mut self.condition_asked,
            Slot::MinPrice => &mut self.min_price_asked,
            Slot::MaxPrice => &mut self.max_price_asked,
        }
    }

    pub fn value(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Condition => self.condition.as_deref(),
            Slot::MinPrice => self.min_price.as_deref(),
            Slot::MaxPrice => self.max_price.as_deref(),
        }
    }

    pub fn value_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Condition => &mut self.condition,
            Slot::MinPrice => &mut self.min_price,
            Slot::MaxPrice => &mut self.max_price,
        }
    }

    /// True when every criteria slot holds a value or a no-filter sentinel.
    pub fn is_complete(&self) -> bool {
        self.search_by_keyword.is_some() && Slot::ORDERED.iter().all(|s| self.value(*s).is_some())
    }

    pub fn is_empty(&self) -> bool {
        *self == Session::default()
    }

    /// Drop every slot so the same identifier can start a new conversation.
    pub fn clear(&mut self) {
        *self = Session::default();
    }
}
