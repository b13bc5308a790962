use crate::error::ExtractionError;
use crate::results::{Document, ListingRecord, ResultBatch, SkippedListing};
use crate::utils::element_text;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

/// One ad per matching element
static LISTING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.aditem").expect("valid selector"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

static PRICE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong").expect("valid selector"));

/// Extract every listing on a results page
///
/// Containers missing one of their fields are logged and recorded in
/// [`ResultBatch::skipped`]; the rest of the page is still extracted.
pub fn extract(document: &Document, page_index: u32) -> ResultBatch {
    let html = document.parse();
    let mut batch = ResultBatch::new(page_index);

    for (position, container) in html.select(&LISTING_SELECTOR).enumerate() {
        match extract_listing(container) {
            Ok(record) => batch.records.push(record),
            Err(error) => {
                ::log::warn!(
                    "Skipping listing {} on page {} ({}): {}",
                    position + 1,
                    page_index,
                    document.url,
                    error
                );
                batch.skipped.push(SkippedListing { position, error });
            }
        }
    }

    ::log::debug!(
        "Page {}: extracted {} listings, skipped {}",
        page_index,
        batch.records.len(),
        batch.skipped.len()
    );

    batch
}

/// Read the four fields out of one listing container
pub fn extract_listing(container: ElementRef<'_>) -> Result<ListingRecord, ExtractionError> {
    let title = container
        .select(&TITLE_SELECTOR)
        .next()
        .ok_or(ExtractionError::MissingField("title"))?;

    // Mileage and year are the first two spans directly under the container
    let mut spans = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "span");
    let mileage = spans.next().ok_or(ExtractionError::MissingField("mileage"))?;
    let year = spans.next().ok_or(ExtractionError::MissingField("year"))?;

    let price = container
        .select(&PRICE_SELECTOR)
        .next()
        .ok_or(ExtractionError::MissingField("price"))?;

    Ok(ListingRecord {
        title: element_text(title),
        mileage: element_text(mileage),
        year: element_text(year),
        price: element_text(price),
    })
}
