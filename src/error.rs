use thiserror::Error;

/// Errors raised while turning a URL into a document
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connection refused, timeout, browser navigation
    #[error("Failed to reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// No WebDriver session could be established
    #[error("WebDriver session error: {0}")]
    Session(String),

    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Errors raised while reading structured data out of a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Result summary element not found")]
    MissingSummaryElement,

    #[error("Result summary could not be read: {0:?}")]
    MalformedSummary(String),

    #[error("Listing is missing its {0} field")]
    MissingField(&'static str),
}

/// Errors in user input or configuration, raised before any fetch
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Car make must not be empty")]
    EmptyMake,

    #[error("Page size must be positive")]
    InvalidPageSize,

    #[error("Page indices start at 1")]
    InvalidPageIndex,

    #[error("Invalid base URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by an output sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reason a run ended in the failed state
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
