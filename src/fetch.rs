//! Listing-page download with a fixed browser identity and request pacing.
//!
//! Each call makes exactly one attempt. The configured delay is applied after
//! every attempt, successful or not, so consecutive requests against the same
//! origin are always spaced out.

use crate::error::FetchError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_POLISH: &str = "pl-PL,pl;q=0.9,en-US;q=0.8,en;q=0.7";

/// Source of listing-page markup.
pub trait PageFetcher {
    /// Fetch `url` once and return its body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    /// Pause after each attempt.
    pub delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            delay: Duration::from_millis(2500),
        }
    }
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(identity_headers())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, settings })
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl PageFetcher for ReqwestFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching page");
        let t0 = Instant::now();
        let result = self.attempt(url).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        match &result {
            Ok(body) => info!(bytes = body.len(), elapsed_ms, "Fetched page"),
            Err(e) => error!(kind = e.kind(), error = %e, elapsed_ms, "Page fetch failed"),
        }

        sleep(self.settings.delay).await;
        result
    }
}

fn identity_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_POLISH));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_settings() -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_millis(500),
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiadomosc/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>Giełda</html>", "text/html; charset=utf-8"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new(fast_settings()).unwrap();
        let body = fetcher
            .fetch(&format!("{}/wiadomosc/", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>Giełda</html>");

        let requests = server.received_requests().await.unwrap();
        let sent = |name: &str| requests[0].headers.get(name).unwrap().to_str().unwrap().to_string();
        assert_eq!(sent("user-agent"), BROWSER_USER_AGENT);
        assert_eq!(sent("accept-language"), ACCEPT_POLISH);
        assert_eq!(sent("accept"), ACCEPT_HTML);
    }

    #[tokio::test]
    async fn test_fetch_fails_on_http_status_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new(fast_settings()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new(fast_settings()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let fetcher = ReqwestFetcher::new(fast_settings()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_delay_applies_after_failure() {
        let fetcher = ReqwestFetcher::new(FetchSettings {
            timeout: Duration::from_millis(500),
            delay: Duration::from_millis(150),
        })
        .unwrap();
        let t0 = Instant::now();
        let _ = fetcher.fetch("not a url").await;
        assert!(t0.elapsed() >= Duration::from_millis(150));
    }
}
