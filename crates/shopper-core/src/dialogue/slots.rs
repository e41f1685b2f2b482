//! Slot descriptors: what to ask for each criterion and how to read the answer.

use crate::search::is_no_filter;
use crate::session::Slot;

pub const CONDITION_PROMPT: &str =
    "Please specify the condition of the required item. (New, Used or None)";
pub const MIN_PRICE_PROMPT: &str = "Please specify the minimum price of the required item. (None in case you dont want to filter with minimum price)";
pub const MAX_PRICE_PROMPT: &str = "Please specify the maximum price of the required item. (None in case you dont want to filter with maximum price)";

/// Canonical value stored for a condition answer that means "any condition"
/// when lenient matching is enabled.
pub const NO_FILTER: &str = "none";

/// Result of interpreting an utterance as the answer to a slot question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAnswer {
    Accepted(String),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub strict_condition: bool,
}

pub struct SlotDescriptor {
    pub slot: Slot,
    pub prompt: &'static str,
    pub normalize: fn(&str, NormalizeOptions) -> SlotAnswer,
}

/// Slots in the order their questions are asked.
pub const SLOT_TABLE: [SlotDescriptor; 3] = [
    SlotDescriptor {
        slot: Slot::Condition,
        prompt: CONDITION_PROMPT,
        normalize: normalize_condition,
    },
    SlotDescriptor {
        slot: Slot::MinPrice,
        prompt: MIN_PRICE_PROMPT,
        normalize: accept_verbatim,
    },
    SlotDescriptor {
        slot: Slot::MaxPrice,
        prompt: MAX_PRICE_PROMPT,
        normalize: accept_verbatim,
    },
];

/// `new`/`used` in any case become `New`/`Used`. A sentinel is kept as typed.
/// Anything else is rejected in strict mode and read as "no filter" otherwise.
pub fn normalize_condition(answer: &str, options: NormalizeOptions) -> SlotAnswer {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("new") {
        SlotAnswer::Accepted("New".to_string())
    } else if answer.eq_ignore_ascii_case("used") {
        SlotAnswer::Accepted("Used".to_string())
    } else if is_no_filter(answer) {
        SlotAnswer::Accepted(answer.to_string())
    } else if options.strict_condition {
        SlotAnswer::Rejected
    } else {
        SlotAnswer::Accepted(NO_FILTER.to_string())
    }
}

pub fn accept_verbatim(answer: &str, _options: NormalizeOptions) -> SlotAnswer {
    SlotAnswer::Accepted(answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: NormalizeOptions = NormalizeOptions {
        strict_condition: true,
    };
    const LENIENT: NormalizeOptions = NormalizeOptions {
        strict_condition: false,
    };

    #[test]
    fn test_table_order_matches_slot_order() {
        let order: Vec<Slot> = SLOT_TABLE.iter().map(|d| d.slot).collect();
        assert_eq!(order, Slot::ORDERED.to_vec());
    }

    #[test]
    fn test_condition_canonical_case() {
        let cases = [("new", "New"), ("NEW", "New"), ("Used", "Used"), (" uSeD ", "Used")];
        for (input, expected) in cases {
            assert_eq!(
                normalize_condition(input, STRICT),
                SlotAnswer::Accepted(expected.to_string())
            );
        }
    }

    #[test]
    fn test_condition_sentinels_kept() {
        assert_eq!(
            normalize_condition("None", STRICT),
            SlotAnswer::Accepted("None".to_string())
        );
        assert_eq!(
            normalize_condition("ALL", STRICT),
            SlotAnswer::Accepted("ALL".to_string())
        );
    }

    #[test]
    fn test_condition_strict_rejects_unknown() {
        assert_eq!(normalize_condition("refurbished", STRICT), SlotAnswer::Rejected);
        assert_eq!(normalize_condition("", STRICT), SlotAnswer::Rejected);
    }

    #[test]
    fn test_condition_lenient_treats_unknown_as_no_filter() {
        assert_eq!(
            normalize_condition("refurbished", LENIENT),
            SlotAnswer::Accepted(NO_FILTER.to_string())
        );
    }

    #[test]
    fn test_prices_are_verbatim() {
        assert_eq!(
            accept_verbatim("100", STRICT),
            SlotAnswer::Accepted("100".to_string())
        );
        assert_eq!(
            accept_verbatim("whatever", STRICT),
            SlotAnswer::Accepted("whatever".to_string())
        );
    }
}
