//! Fetch capability
//!
//! This module defines what the orchestrator needs from the network:
//! - The `Fetcher` trait, one request per link
//! - `FetchOutcome`, the status and body handed to validation
//! - `HttpFetcher`, the reqwest-backed implementation
//!
//! Non-200 responses are outcomes, not errors; deciding what to keep is the
//! validator's job. Only failures that leave no response at all are errors.
//! Nothing is retried.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Status code and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// HTTP status code
    pub status: u16,

    /// Response body as text (possibly empty)
    pub body: String,
}

impl FetchOutcome {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failures that produce no response
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("Request failed for {url}: {reason}")]
    Other { url: String, reason: String },
}

/// Retrieves pages over the network
///
/// Implementations are shared by every group task and must be cheap to call
/// concurrently.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one link
    async fn fetch(&self, link: &str) -> Result<FetchOutcome, FetchError>;
}

/// Builds an HTTP client with the crawler's identity and timeouts
///
/// # Example
///
/// ```no_run
/// use gleaner::config::UserAgentConfig;
/// use gleaner::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a reqwest client
///
/// Redirects are followed by the client; the outcome is always reported against
/// the link that was requested.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a client configured from `config`
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, link: &str) -> Result<FetchOutcome, FetchError> {
        let url = Url::parse(link).map_err(|e| FetchError::InvalidUrl {
            url: link.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(link, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| FetchError::Body {
            url: link.to_string(),
            reason: e.to_string(),
        })?;

        Ok(FetchOutcome { status, body })
    }
}

/// Maps a reqwest failure to a `FetchError`
fn classify_error(link: &str, error: reqwest::Error) -> FetchError {
    let url = link.to_string();
    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            reason: error.to_string(),
        }
    } else {
        FetchError::Other {
            url,
            reason: error.to_string(),
        }
    }
}
