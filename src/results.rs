use crate::error::ExtractionError;
use scraper::Html;
use serde::{Deserialize, Serialize};

/// A fetched page: its URL and the HTML source as delivered or rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// URL the document was fetched from
    pub url: String,

    /// Raw HTML source
    pub source: String,
}

impl Document {
    /// Create a new document
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Parse the source into a queryable DOM
    ///
    /// `Html` is not `Send`, so callers parse inside synchronous code and
    /// never hold the tree across an await.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.source)
    }
}

/// One classified ad as presented on a results page
///
/// Fields are kept as the site shows them ("12.500 km", "EZ 03/2015",
/// "4.990 € VB") since their formatting varies too much to parse reliably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Mileage")]
    pub mileage: String,

    #[serde(rename = "Year")]
    pub year: String,

    #[serde(rename = "Price")]
    pub price: String,
}

impl ListingRecord {
    /// Create a new listing record
    pub fn new(
        title: impl Into<String>,
        mileage: impl Into<String>,
        year: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            mileage: mileage.into(),
            year: year.into(),
            price: price.into(),
        }
    }
}

/// A listing container that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedListing {
    /// Zero-based position of the container on its page
    pub position: usize,

    /// Why the container was dropped
    pub error: ExtractionError,
}

/// Records extracted from one results page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBatch {
    /// 1-based index of the page the records came from
    pub page_index: u32,

    pub records: Vec<ListingRecord>,

    pub skipped: Vec<SkippedListing>,
}

impl ResultBatch {
    /// Create an empty batch for the given page
    pub fn new(page_index: u32) -> Self {
        Self {
            page_index,
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
