use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// 以 reqwest 抓取商品頁面
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching product page: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("Response status for {}: {}", url, response.status());

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::yaml_config::DEFAULT_USER_AGENT;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/product/1")
                .header("User-Agent", DEFAULT_USER_AGENT);
            then.status(200).body("<html>ok</html>");
        });

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let page = fetcher.fetch(&server.url("/product/1")).await.unwrap();

        page_mock.assert();
        assert_eq!(page, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_fails_on_error_status() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(404);
        });

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch(&server.url("/gone")).await.unwrap_err();

        page_mock.assert();
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Network);
    }
}
