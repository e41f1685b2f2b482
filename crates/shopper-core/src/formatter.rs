//! Rendering of terminal search outcomes into chat messages.
//!
//! Messages are small HTML fragments (`<br>`, links, an image per item) that
//! the chat front-end injects as-is. Every rendering entry point that takes a
//! session clears it, since each outcome here ends the conversation cycle.

use crate::search::{FetchedItem, SearchOutcome};
use crate::session::Session;

pub const FAILURE_SUFFIX: &str = "<br>  What else would you like to search for? ";
pub const NO_RESULTS_MESSAGE: &str =
    "There are no items matching your criteria. <br> What else would you like to search for? ";
pub const CLOSING_QUESTION: &str = "What else would you like to search for?";

const LINK_STYLE: &str = "target='_blank' style='color:#c48843;'";

pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Render `outcome` and reset `session` for a new conversation.
    pub fn finish(session: &mut Session, outcome: &SearchOutcome, requested: usize) -> String {
        let message = Self::render(outcome, requested);
        session.clear();
        message
    }

    pub fn render(outcome: &SearchOutcome, requested: usize) -> String {
        match outcome {
            SearchOutcome::Failure { message } => Self::render_failure(message),
            SearchOutcome::NoResults => NO_RESULTS_MESSAGE.to_string(),
            SearchOutcome::Items {
                count,
                items,
                results_page_url,
            } => Self::render_items(*count, items, results_page_url.as_deref(), requested),
        }
    }

    pub fn render_failure(message: &str) -> String {
        format!("{}{}", message, FAILURE_SUFFIX)
    }

    /// Count reported to the user: the actual match count when fewer than
    /// requested were found, otherwise the requested page size.
    pub fn reported_count(count: usize, requested: usize) -> usize {
        count.min(requested)
    }

    fn render_items(
        count: usize,
        items: &[FetchedItem],
        results_page_url: Option<&str>,
        requested: usize,
    ) -> String {
        let mut out = format!(
            "There are {} items matching your criteria : <br>",
            Self::reported_count(count, requested)
        );

        for (index, item) in items.iter().enumerate() {
            Self::render_item(&mut out, index + 1, item);
        }

        if let Some(url) = results_page_url {
            let url = escape_html(url);
            out.push_str(&format!(
                "<br> Results Page URL : <a href='{url}' {LINK_STYLE}>{url}</a> <br>",
            ));
        }
        out.push_str(&format!("<br> {}", CLOSING_QUESTION));

        out
    }

    fn render_item(out: &mut String, n: usize, item: &FetchedItem) {
        let condition = item
            .condition
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "Not specified".to_string());
        let price = match (&item.price, &item.currency) {
            (Some(price), Some(currency)) => format!("{} {}", price, currency),
            (Some(price), None) => price.clone(),
            (None, _) => "Not available".to_string(),
        };

        out.push_str(&format!(
            "<br> Item {n} Title : {}<br> Item {n} Condition : {}<br> Item {n} Price : {}",
            escape_html(&item.title),
            condition,
            escape_html(&price),
        ));
        if let Some(gallery) = &item.gallery_url {
            out.push_str(&format!(
                "<br> Item {n} Gallery : <img src='{}'></img>",
                escape_html(gallery)
            ));
        }
        out.push_str(&format!(
            "<br> Item {n} URL : <a href='{url}' {LINK_STYLE}>{url}</a><br>",
            url = escape_html(&item.item_url),
        ));
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
