use crate::error::FetchError;
use crate::results::Document;
use async_trait::async_trait;

/// Resolves a URL to a document
///
/// Implemented by the browser-backed [`RenderedFetcher`](super::RenderedFetcher),
/// used where the page needs script execution, and the plain-HTTP
/// [`StaticFetcher`](super::StaticFetcher) used for everything else.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page
    async fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}
