use crate::error::ConfigError;
use crate::paginator::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, Paginator};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for a harvesting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Root of the classifieds site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listings per results page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Highest page the site will serve
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between successive page fetches, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Use the rendered first page for listings instead of fetching it again
    #[serde(default = "default_true")]
    pub reuse_first_page: bool,

    /// User-Agent header for plain HTTP fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for a single HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// CSV file the listings are written to
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

/// Default value for base_url
fn default_base_url() -> String {
    "https://www.ebay-kleinanzeigen.de".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

/// One second between pages
fn default_delay_ms() -> u64 {
    1000
}

/// Default value for webdriver_url (geckodriver)
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_path() -> String {
    "results.csv".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            delay_ms: default_delay_ms(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            reuse_first_page: true,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            output_path: default_output_path(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn apply_env(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Throttle between page fetches
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Paginator for the configured site and limits
    pub fn paginator(&self) -> Result<Paginator, ConfigError> {
        Paginator::new(&self.base_url, self.page_size, self.max_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert!(config.headless);
        assert_eq!(config, ScraperConfig::from_json("{}").unwrap());
    }

    #[test]
    fn test_partial_json() {
        let config =
            ScraperConfig::from_json(r#"{"max_pages": 3, "delay_ms": 0, "headless": false}"#)
                .unwrap();
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.delay(), Duration::ZERO);
        assert!(!config.headless);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ScraperConfig::from_json("{max_pages"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://127.0.0.1:8080", "page_size": 10}}"#).unwrap();

        let config = ScraperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.paginator().unwrap().page_count(25.0), 3);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ScraperConfig::from_file("/nonexistent/scraper.json"),
            Err(ConfigError::Read(_))
        ));
    }
}
