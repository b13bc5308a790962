use crate::error::FetchError;
use crate::fetchers::PageFetcher;
use crate::results::Document;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound for navigating to a page and reading its source
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(45);

/// How long to wait for a marker element to appear after navigation
const ELEMENT_WAIT: Duration = Duration::from_secs(10);

/// Fetches pages through a WebDriver-controlled browser, so scripts run
/// before the source is read.
pub struct RenderedFetcher {
    client: Client,
    wait_for: Option<String>,
}

impl RenderedFetcher {
    /// Connect to a WebDriver server and open a browser session
    ///
    /// Falls back to the usual local driver ports when `webdriver_url`
    /// is unreachable.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, FetchError> {
        let client = connect_to_webdriver(webdriver_url, headless).await?;
        Ok(Self {
            client,
            wait_for: None,
        })
    }

    /// Wait for an element matching `css` before reading the page source
    ///
    /// If it doesn't show up in time the source is read anyway and the
    /// caller's own lookups decide what's missing.
    pub fn wait_for(mut self, css: &str) -> Self {
        self.wait_for = Some(css.to_string());
        self
    }

    /// End the browser session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }

    async fn render(&self, url: &str) -> Result<Document, FetchError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| navigation_error(e, "accessing", url))?;

        if let Some(css) = &self.wait_for {
            let found = self
                .client
                .wait()
                .at_most(ELEMENT_WAIT)
                .for_element(Locator::Css(css))
                .await;
            if let Err(e) = found {
                ::log::warn!("{} did not appear on {}: {}", css, url, e);
            }
        }

        let source = self
            .client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", url))?;

        Ok(Document::new(url, source))
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let start = std::time::Instant::now();
        ::log::debug!("RENDER: {}", url);

        let document = match timeout(NAVIGATION_TIMEOUT, self.render(url)).await {
            Ok(result) => result?,
            Err(_) => {
                ::log::error!("Timeout rendering: {}", url);
                return Err(FetchError::Unreachable {
                    url: url.to_string(),
                    reason: format!("timed out after {}s", NAVIGATION_TIMEOUT.as_secs()),
                });
            }
        };

        ::log::debug!(
            "Rendered {} in {:.2} seconds",
            url,
            start.elapsed().as_secs_f64()
        );
        Ok(document)
    }
}

/// Browser capabilities asking Firefox or Chrome for a headless window
fn capabilities(headless: bool) -> serde_json::Map<String, serde_json::Value> {
    let mut caps = serde_json::Map::new();
    if headless {
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["-headless"] }),
        );
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless", "--disable-gpu"] }),
        );
    }
    caps
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str, headless: bool) -> Result<Client, FetchError> {
    let caps = capabilities(headless);

    let first_error = match ClientBuilder::native()
        .capabilities(caps.clone())
        .connect(webdriver_url)
        .await
    {
        Ok(client) => {
            ::log::debug!(
                "Connected to WebDriver at {} (headless: {})",
                webdriver_url,
                headless
            );
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    // If we couldn't connect, try with common alternative URLs
    let fallback_urls = [
        "http://localhost:4444", // geckodriver default
        "http://localhost:9515", // ChromeDriver default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native()
            .capabilities(caps.clone())
            .connect(url)
            .await
        {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(FetchError::Session(format!("{}: {}", webdriver_url, first_error)))
}

/// Maps errors that occur during navigation or page source retrieval
fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> FetchError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
        FetchError::Session(error.to_string())
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
        FetchError::Unreachable {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
