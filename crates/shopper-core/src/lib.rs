//! Core of the Luxury Shopper chatbot.
//!
//! A visitor describes what they are looking for in a few short chat turns.
//! The crate keeps one slot-filling session per visitor, asks for the missing
//! search criteria one at a time, queries the eBay Finding API once all of
//! them are known and renders the matching items back into a chat message.
//!
//! - [`session`]: per-visitor slot state and the concurrent session store
//! - [`dialogue`]: the ask-then-consume slot-filling engine
//! - [`search`]: query construction, transport and outcome classification
//! - [`formatter`]: HTML rendering of search outcomes
//! - [`config`]: YAML configuration with environment overrides

pub mod config;
pub mod dialogue;
pub mod errors;
pub mod formatter;
pub mod search;
pub mod session;

pub use config::*;
pub use dialogue::{Advance, ConversationEngine, Reply, TurnOutcome};
pub use errors::ShopperError;
pub use formatter::ResponseFormatter;
pub use search::{HttpTransport, SearchCriteria, SearchGateway, SearchOutcome, SearchTransport};
pub use session::{generate_session_id, Session, SessionHandle, SessionStore, Slot};

#[cfg(test)]
pub mod test_utils;
