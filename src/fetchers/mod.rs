pub mod browser;
pub mod fetcher;
pub mod http;

pub use browser::RenderedFetcher;
pub use fetcher::PageFetcher;
pub use http::StaticFetcher;
