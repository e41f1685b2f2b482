//! Slot-filling conversation engine.
//!
//! Each utterance advances one session through
//! `AwaitKeyword -> AwaitCondition -> AwaitMinPrice -> AwaitMaxPrice -> Dispatch`.
//! The first utterance is always the keyword. Every criteria slot then follows
//! ask-then-consume: the turn that first reaches an empty slot emits its
//! question and stops, and the next utterance is read as the answer. Once all
//! slots hold a value the search is dispatched, the outcome rendered and the
//! session cleared, whatever the outcome.

pub mod slots;

pub use slots::{
    NormalizeOptions, SlotAnswer, SlotDescriptor, CONDITION_PROMPT, MAX_PRICE_PROMPT,
    MIN_PRICE_PROMPT, SLOT_TABLE,
};

use crate::config::DialogueSettings;
use crate::errors::ShopperError;
use crate::formatter::ResponseFormatter;
use crate::search::{SearchCriteria, SearchGateway, SearchOutcome};
use crate::session::{Session, Slot};

/// Result of applying one utterance to the slot state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A question must be sent and the turn ends here.
    Ask {
        slot: Slot,
        prompt: &'static str,
        /// Session as it stood before the question's marker was flipped.
        /// `None` when the question is repeated after a rejected answer.
        snapshot: Option<Session>,
        repeated: bool,
    },
    /// Every slot is filled; the search can be dispatched.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Question,
    Results { reported: usize },
    NoResults,
    UpstreamFailure,
}

/// What a chat turn sends back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    /// Slot state mirrored to the client on question replies.
    pub session: Option<Session>,
    pub outcome: TurnOutcome,
}

impl Reply {
    pub fn is_terminal(&self) -> bool {
        self.outcome != TurnOutcome::Question
    }
}

#[derive(Clone)]
pub struct ConversationEngine {
    gateway: SearchGateway,
    settings: DialogueSettings,
}

impl ConversationEngine {
    pub fn new(gateway: SearchGateway, settings: DialogueSettings) -> Self {
        Self { gateway, settings }
    }

    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            strict_condition: self.settings.strict_condition,
        }
    }

    /// Apply `utterance` to `session` without performing any search.
    pub fn advance(&self, session: &mut Session, utterance: &str) -> Advance {
        let mut pending = Some(utterance);

        if session.search_by_keyword.is_none() {
            log::debug!("Binding search keyword '{}'", utterance);
            session.search_by_keyword = Some(utterance.to_string());
            pending = None;
        }

        for descriptor in SLOT_TABLE.iter() {
            let slot = descriptor.slot;
            let marker = session.marker_mut(slot);
            let asked = *marker.get_or_insert(false);

            if session.value(slot).is_some() {
                continue;
            }

            if !asked {
                let snapshot = session.clone();
                *session.marker_mut(slot) = Some(true);
                log::debug!("Asking for {}", slot);
                return Advance::Ask {
                    slot,
                    prompt: descriptor.prompt,
                    snapshot: Some(snapshot),
                    repeated: false,
                };
            }

            let Some(answer) = pending.take() else {
                // Only reachable for a hand-built session whose marker was set
                // on the same turn the keyword was bound.
                return Advance::Ask {
                    slot,
                    prompt: descriptor.prompt,
                    snapshot: None,
                    repeated: true,
                };
            };

            match (descriptor.normalize)(answer, self.normalize_options()) {
                SlotAnswer::Accepted(value) => {
                    log::debug!("Filled {} = '{}'", slot, value);
                    *session.value_mut(slot) = Some(value);
                }
                SlotAnswer::Rejected => {
                    log::debug!("Rejected answer '{}' for {}", answer, slot);
                    return Advance::Ask {
                        slot,
                        prompt: descriptor.prompt,
                        snapshot: None,
                        repeated: true,
                    };
                }
            }
        }

        Advance::Ready
    }

    /// Run one chat turn. Any terminal path, failed searches included, leaves
    /// the session empty.
    pub async fn handle_turn(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Result<Reply, ShopperError> {
        match self.advance(session, utterance) {
            Advance::Ask {
                prompt, snapshot, ..
            } => Ok(Reply {
                message: prompt.to_string(),
                session: snapshot.filter(|_| self.settings.expose_session_state),
                outcome: TurnOutcome::Question,
            }),
            Advance::Ready => self.dispatch(session).await,
        }
    }

    async fn dispatch(&self, session: &mut Session) -> Result<Reply, ShopperError> {
        let Some(criteria) = SearchCriteria::from_session(session) else {
            session.clear();
            return Err(ShopperError::InternalError(
                "dispatch reached with unfilled slots".to_string(),
            ));
        };

        let outcome = match self.gateway.search(&criteria).await {
            Ok(outcome) => outcome,
            Err(e) => {
                session.clear();
                return Err(e);
            }
        };

        let requested = self.gateway.requested_results();
        let kind = match &outcome {
            SearchOutcome::Failure { .. } => TurnOutcome::UpstreamFailure,
            SearchOutcome::NoResults => TurnOutcome::NoResults,
            SearchOutcome::Items { count, .. } => TurnOutcome::Results {
                reported: ResponseFormatter::reported_count(*count, requested),
            },
        };
        let message = ResponseFormatter::finish(session, &outcome, requested);

        Ok(Reply {
            message,
            session: None,
            outcome: kind,
        })
    }
}
