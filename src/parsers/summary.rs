use crate::error::ExtractionError;
use crate::results::Document;
use crate::utils::{collapse_whitespace, element_text};
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// The sentence above the result list, e.g. "1 - 25 von 1.234 Ergebnissen für „bmw“"
pub const SUMMARY_CSS: &str = "span.breadcrump-summary";

static SUMMARY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(SUMMARY_CSS).expect("valid selector"));

/// German thousands grouping: "1.234", "12.345.678"
static GROUPED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").expect("valid regex"));

/// Position of the total in the whitespace-split summary sentence
pub const COUNT_TOKEN_INDEX: usize = 4;

/// Total number of listings matching the search on a rendered results page
pub fn count(document: &Document) -> Result<f64, ExtractionError> {
    let html = document.parse();
    let summary = html
        .select(&SUMMARY_SELECTOR)
        .next()
        .ok_or(ExtractionError::MissingSummaryElement)?;

    let text = element_text(summary);
    ::log::debug!("Result summary on {}: {:?}", document.url, text);

    parse_summary_text(&text)
}

/// Read the result total out of the summary sentence
///
/// The total is the fifth whitespace-separated token. The value is an
/// upper-bound estimate: a token the site formats oddly may come out
/// fractional.
pub fn parse_summary_text(text: &str) -> Result<f64, ExtractionError> {
    let malformed = || ExtractionError::MalformedSummary(collapse_whitespace(text));

    let token = text
        .split_whitespace()
        .nth(COUNT_TOKEN_INDEX)
        .ok_or_else(malformed)?;

    parse_count_token(token).ok_or_else(malformed)
}

fn parse_count_token(token: &str) -> Option<f64> {
    let value = if GROUPED_NUMBER.is_match(token) {
        token.replace('.', "").parse::<f64>().ok()?
    } else {
        token.parse::<f64>().ok()?
    };

    (value.is_finite() && value >= 0.0).then_some(value)
}
