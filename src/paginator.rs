use crate::error::ConfigError;
use crate::query::SearchQuery;
use url::Url;

/// Listings shown per results page by the site
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// The site refuses to paginate past this page
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Category path of the used-car search
const CATEGORY_CODE: &str = "k0c216";

/// One results page to visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub page_index: u32,
    pub url: String,
}

/// Turns a result count into the pages to visit and their URLs
#[derive(Debug, Clone)]
pub struct Paginator {
    base_url: Url,
    page_size: u32,
    max_pages: u32,
}

impl Paginator {
    /// Create a paginator for the given site root
    pub fn new(base_url: &str, page_size: u32, max_pages: u32) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        Ok(Self {
            base_url: parse_base(base_url)?,
            page_size,
            max_pages,
        })
    }

    /// Number of pages needed to show `result_count` listings, capped at `max_pages`
    ///
    /// The count is an upper-bound estimate and may be fractional; zero,
    /// negative and non-finite counts give zero pages.
    pub fn page_count(&self, result_count: f64) -> u32 {
        if !result_count.is_finite() || result_count <= 0.0 {
            return 0;
        }
        let pages = (result_count / f64::from(self.page_size)).ceil();
        if pages >= f64::from(self.max_pages) {
            self.max_pages
        } else {
            pages as u32
        }
    }

    /// Canonical search URL for one page of the query
    pub fn build_url(&self, query: &SearchQuery, page_index: u32) -> Result<String, ConfigError> {
        if page_index == 0 {
            return Err(ConfigError::InvalidPageIndex);
        }
        Ok(search_url(&self.base_url, query, page_index))
    }

    /// Descriptors for pages `1..=page_count(result_count)`
    pub fn pages<'a>(
        &'a self,
        query: &'a SearchQuery,
        result_count: f64,
    ) -> impl Iterator<Item = PageDescriptor> + 'a {
        (1..=self.page_count(result_count)).map(move |page_index| PageDescriptor {
            page_index,
            url: search_url(&self.base_url, query, page_index),
        })
    }
}

/// Builds `{base}/s-autos/seite:{page}/{make[-model]}/k0c216`
///
/// The make/model segment is percent-encoded as a path segment, so
/// plain values are interpolated as-is while spaces or slashes can't
/// break the path structure. A trailing slash on `base` is ignored.
pub fn build_url(base: &str, query: &SearchQuery, page_index: u32) -> Result<String, ConfigError> {
    if page_index == 0 {
        return Err(ConfigError::InvalidPageIndex);
    }
    Ok(search_url(&parse_base(base)?, query, page_index))
}

fn parse_base(base: &str) -> Result<Url, ConfigError> {
    match Url::parse(base) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ConfigError::InvalidBaseUrl(base.to_string())),
    }
}

fn search_url(base: &Url, query: &SearchQuery, page_index: u32) -> String {
    let page = format!("seite:{}", page_index);
    let slug = query.slug();

    let mut url = base.clone();
    // Only cannot-be-a-base URLs refuse segments, and parse_base rejects those
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["s-autos", page.as_str(), slug.as_str(), CATEGORY_CODE]);
    }
    url.to_string()
}
