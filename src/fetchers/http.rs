use crate::error::FetchError;
use crate::fetchers::PageFetcher;
use crate::results::Document;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches pages with a plain HTTP GET; no browser involved
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    /// Build a fetcher sending `user_agent` and giving up after `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        ::log::debug!("GET {}", url);

        let unreachable = |e: reqwest::Error| FetchError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            ::log::error!("HTTP {} for {}", status.as_u16(), url);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(unreachable)?;
        ::log::debug!("Fetched {} ({} bytes)", url, body.len());

        Ok(Document::new(url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> StaticFetcher {
        StaticFetcher::new("test-agent/1.0", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/s-autos/seite:1/bmw/k0c216"))
            .and(header("user-agent", "test-agent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/s-autos/seite:1/bmw/k0c216", server.uri());
        let doc = fetcher().fetch(&url).await.unwrap();

        assert_eq!(doc.url, url);
        assert_eq!(doc.source, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetcher().fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        // Port 9 (discard) is essentially never listening
        let err = fetcher().fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable { .. }));
    }
}
