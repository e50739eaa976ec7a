//! HTTP transport seam
//!
//! The fetch client only needs "send a method to a path, get status and bytes
//! back". `ReqwestTransport` does that over the network; tests plug in an
//! in-memory service behind the same trait.

use async_trait::async_trait;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::FeedConfig;
use crate::error::{ConfigError, FetchError, FetchResult};

/// HTTP methods used against the notification service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status and undecoded body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one request and returns the raw response
///
/// Implementations fail only with `FetchError::TransportFailed`; any status
/// the server sends is a successful transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, method: Method, path: &str) -> FetchResult<RawResponse>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: config.api_base_url.clone(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, method: Method, path: &str) -> FetchResult<RawResponse> {
        let url = self.url_for(path);
        debug!(%method, %url, "Sending request");

        let response = self
            .client
            .request(method.into(), &url)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_trims_trailing_slash() {
        let transport = ReqwestTransport::new(Url::parse("http://localhost:5000/").unwrap());
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(
            transport.url_for("/api/notifications"),
            "http://localhost:5000/api/notifications"
        );
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let transport =
            ReqwestTransport::new(Url::parse("https://example.com/social").unwrap());
        assert_eq!(
            transport.url_for("/api/notifications/n1"),
            "https://example.com/social/api/notifications/n1"
        );
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "[]").is_success());
        assert!(RawResponse::new(204, "{}").is_success());
        assert!(!RawResponse::new(199, "{}").is_success());
        assert!(!RawResponse::new(300, "{}").is_success());
        assert!(!RawResponse::new(500, "{}").is_success());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(Method::Delete), reqwest::Method::DELETE);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
