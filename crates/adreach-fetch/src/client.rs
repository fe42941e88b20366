//! HTTP client for the ads archive.

use std::time::Duration;

use adreach_types::AdreachError;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use crate::url::{ArchiveQuery, SeedUrlError, redacted};
use crate::{DecodeError, Page, decode_page};

/// Configuration for the archive client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint of the first request.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout (separate from request timeout).
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::url::BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("adreach/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that end a crawl.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("Server returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The requested URL, token redacted.
        url: String,
    },

    /// The response body is not a valid page.
    #[error("Could not decode page from {url}: {source}")]
    Decode {
        /// The requested URL, token redacted.
        url: String,
        /// The decoding failure.
        source: DecodeError,
    },

    /// A crawl limit was reached before the archive ran out of pages.
    #[error("{0}")]
    LimitReached(String),
}

impl FetchError {
    /// Returns true if the error is a crawl limit rather than a failure.
    #[must_use]
    pub const fn is_limit(&self) -> bool {
        matches!(self, Self::LimitReached(_))
    }
}

impl From<FetchError> for AdreachError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Http(e) => Self::Http(e.to_string()),
            other @ FetchError::Status { .. } => Self::Http(other.to_string()),
            other @ FetchError::Decode { .. } => Self::Decode(other.to_string()),
            FetchError::LimitReached(reason) => Self::LimitReached(reason),
        }
    }
}

/// HTTP client for archive pages.
///
/// No retries: a failed request ends the crawl.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    config: ClientConfig,
}

impl ArchiveClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the first request of a crawl against the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured `base_url` is not an absolute URL.
    pub fn seed_url(&self, query: &ArchiveQuery) -> Result<Url, SeedUrlError> {
        crate::url::seed_url(&self.config.base_url, query)
    }

    /// Fetches and decodes one page.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn get_page(&self, url: &Url) -> Result<Page, FetchError> {
        debug!(url = %redacted(url), "fetching page");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: redacted(url),
            });
        }

        let body = response.bytes().await?;
        decode_page(&body).map_err(|source| FetchError::Decode {
            url: redacted(url),
            source,
        })
    }
}
