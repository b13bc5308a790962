// Re-export modules
pub mod config;
pub mod error;
pub mod fetchers;
pub mod output;
pub mod paginator;
pub mod parsers;
pub mod pipeline;
pub mod query;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::Error;
pub use pipeline::{Pipeline, RunReport};
pub use query::SearchQuery;
pub use results::{Document, ListingRecord, ResultBatch};

use fetchers::{RenderedFetcher, StaticFetcher};
use output::RecordSink;
use parsers::summary::SUMMARY_CSS;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Main builder for a harvesting run against the live site
///
/// Opens a browser session for the result count and a plain HTTP client
/// for the listing pages, then drives a [`Pipeline`] over them.
pub struct Search {
    query: SearchQuery,
    config: ScraperConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl Search {
    /// Create a new Search for the given query with default configuration
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            config: ScraperConfig::default(),
            stop: None,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop between pages once `stop` is set
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Run the search, streaming every page's listings into `sink`
    pub async fn run(&self, sink: &mut dyn RecordSink) -> Result<RunReport, Error> {
        let paginator = self.config.paginator()?;
        let listings = StaticFetcher::new(&self.config.user_agent, self.config.request_timeout())?;

        ::log::info!(
            "Connecting to WebDriver at {} (headless: {})",
            self.config.webdriver_url,
            self.config.headless
        );
        let rendered = RenderedFetcher::connect(&self.config.webdriver_url, self.config.headless)
            .await?
            .wait_for(SUMMARY_CSS);

        let mut pipeline = Pipeline::new(paginator, &rendered, &listings)
            .with_delay(self.config.delay())
            .with_reuse_first_page(self.config.reuse_first_page);
        if let Some(stop) = &self.stop {
            pipeline = pipeline.with_stop_flag(Arc::clone(stop));
        }

        let result = pipeline.run(&self.query, sink).await;

        drop(pipeline);
        rendered.close().await;

        result
    }
}
