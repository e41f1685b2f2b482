//! Parsing of `findItemsByKeywords` JSON payloads.
//!
//! The Finding API wraps nearly every field in a one-element array, so most
//! lookups are `field[0]`. Nothing outside this module knows that layout.

use crate::errors::ShopperError;
use serde::Serialize;
use serde_json::Value;

const RESPONSE_ROOT: &str = "findItemsByKeywordsResponse";

/// One result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedItem {
    pub id: String,
    pub gallery_url: Option<String>,
    pub item_url: String,
    pub title: String,
    pub condition: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The service acknowledged the call with `Failure`.
    Failure { message: String },
    NoResults,
    Items {
        /// Value of the `@count` field, which may differ from `items.len()`.
        count: usize,
        items: Vec<FetchedItem>,
        results_page_url: Option<String>,
    },
}

impl SearchOutcome {
    /// Classify a raw payload. Failure acknowledgement wins over the result
    /// count, and a zero count wins over any item rows.
    pub fn from_payload(payload: &Value) -> Result<Self, ShopperError> {
        let root = &payload[RESPONSE_ROOT][0];
        if root.is_null() {
            return Err(ShopperError::MalformedResponse(format!(
                "missing {} envelope",
                RESPONSE_ROOT
            )));
        }

        let ack = first_str(&root["ack"])
            .ok_or_else(|| ShopperError::MalformedResponse("missing ack".to_string()))?;

        if ack.eq_ignore_ascii_case("failure") {
            let message = first_str(&root["errorMessage"][0]["error"][0]["message"])
                .ok_or_else(|| {
                    ShopperError::MalformedResponse(
                        "failure acknowledgement without error message".to_string(),
                    )
                })?;
            return Ok(SearchOutcome::Failure {
                message: message.to_string(),
            });
        }

        let result = &root["searchResult"][0];
        let count = parse_count(&result["@count"])?;
        if count == 0 {
            return Ok(SearchOutcome::NoResults);
        }

        let items = match result["item"].as_array() {
            Some(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| parse_item(i, row))
                .collect::<Result<Vec<_>, _>>()?,
            None => {
                return Err(ShopperError::MalformedResponse(format!(
                    "@count is {} but no item list present",
                    count
                )))
            }
        };

        Ok(SearchOutcome::Items {
            count,
            items,
            results_page_url: first_str(&root["itemSearchURL"]).map(str::to_string),
        })
    }
}

fn first_str(value: &Value) -> Option<&str> {
    match value {
        Value::Array(values) => values.first().and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

fn parse_count(value: &Value) -> Result<usize, ShopperError> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<usize>().ok(),
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        _ => None,
    };
    parsed.ok_or_else(|| ShopperError::MalformedResponse(format!("invalid @count: {}", value)))
}

fn required(row: &Value, field: &str, index: usize) -> Result<String, ShopperError> {
    first_str(&row[field]).map(str::to_string).ok_or_else(|| {
        ShopperError::MalformedResponse(format!("item {} is missing {}", index + 1, field))
    })
}

fn parse_item(index: usize, row: &Value) -> Result<FetchedItem, ShopperError> {
    let price = &row["sellingStatus"][0]["currentPrice"][0];

    Ok(FetchedItem {
        id: required(row, "itemId", index)?,
        gallery_url: first_str(&row["galleryURL"]).map(str::to_string),
        item_url: required(row, "viewItemURL", index)?,
        title: required(row, "title", index)?,
        condition: first_str(&row["condition"][0]["conditionDisplayName"]).map(str::to_string),
        price: price["__value__"].as_str().map(str::to_string),
        currency: price["@currencyId"].as_str().map(str::to_string),
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_ack_extracts_message() {
        let outcome = SearchOutcome::from_payload(&fixtures::failure("Invalid keyword")).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Failure {
                message: "Invalid keyword".to_string()
            }
        );
    }

    #[test]
    fn test_failure_ack_is_case_insensitive() {
        let mut payload = fixtures::failure("Bad app id");
        payload["findItemsByKeywordsResponse"][0]["ack"] = json!(["FAILURE"]);
        assert!(matches!(
            SearchOutcome::from_payload(&payload).unwrap(),
            SearchOutcome::Failure { .. }
        ));
    }

    #[test]
    fn test_zero_count_is_no_results() {
        assert_eq!(
            SearchOutcome::from_payload(&fixtures::empty()).unwrap(),
            SearchOutcome::NoResults
        );
    }

    #[test]
    fn test_items_are_parsed() {
        let payload = fixtures::success(
            "2",
            vec![
                fixtures::item("111", "Gucci Tshirt", "120.0"),
                fixtures::item("222", "Gucci Tee", "95.5"),
            ],
        );

        match SearchOutcome::from_payload(&payload).unwrap() {
            SearchOutcome::Items {
                count,
                items,
                results_page_url,
            } => {
                assert_eq!(count, 2);
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].id, "111");
                assert_eq!(items[0].title, "Gucci Tshirt");
                assert_eq!(items[0].condition.as_deref(), Some("New with tags"));
                assert_eq!(items[1].price.as_deref(), Some("95.5"));
                assert_eq!(items[1].currency.as_deref(), Some("USD"));
                assert_eq!(items[1].item_url, "http://www.example.com/itm/222");
                assert!(results_page_url.unwrap().contains("_nkw=gucci"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_optional_item_fields_may_be_absent() {
        let row = json!({
            "itemId": ["333"],
            "title": ["Plain belt"],
            "viewItemURL": ["http://www.example.com/itm/333"]
        });
        let payload = fixtures::success("1", vec![row]);

        match SearchOutcome::from_payload(&payload).unwrap() {
            SearchOutcome::Items { items, .. } => {
                assert_eq!(items[0].gallery_url, None);
                assert_eq!(items[0].condition, None);
                assert_eq!(items[0].price, None);
                assert_eq!(items[0].currency, None);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_item_field_is_malformed() {
        let row = json!({ "itemId": ["333"], "title": ["No link"] });
        let err = SearchOutcome::from_payload(&fixtures::success("1", vec![row])).unwrap_err();
        assert!(err.to_string().contains("viewItemURL"));
    }

    #[test]
    fn test_unexpected_shapes_are_malformed() {
        assert!(SearchOutcome::from_payload(&json!({})).is_err());
        let empty_envelope = json!({ "findItemsByKeywordsResponse": [{}] });
        assert!(SearchOutcome::from_payload(&empty_envelope).is_err());

        let mut payload = fixtures::empty();
        payload["findItemsByKeywordsResponse"][0]["searchResult"][0]["@count"] = json!("many");
        assert!(SearchOutcome::from_payload(&payload).is_err());
    }
}
