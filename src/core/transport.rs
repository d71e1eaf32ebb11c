//! HTTP transport for index-crawler
//!
//! The crawler only needs two operations from the network: fetch a page as
//! text, and stream a resource to a file. `Transport` is the seam that lets
//! tests swap `HttpTransport` for an in-memory fake.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use log::debug;
use reqwest::{Client, ClientBuilder};
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

use crate::core::error::{Error, Result};

/// Default overall request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Network primitives used by the classifier, the lister and the orchestrator
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET `url` and return its body as text. Non-success statuses are errors.
    async fn fetch_page(&self, url: &Url) -> Result<String>;

    /// GET `url` and write its body to `dest`, replacing any existing file.
    /// Returns the number of bytes written.
    async fn fetch_to_file(&self, url: &Url, dest: &Path) -> Result<u64>;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Overall per-request timeout, body transfer included
    pub timeout: Option<Duration>,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: format!("index-crawler/{}", env!("INDEX_CRAWLER_VERSION")),
        }
    }
}

/// `Transport` backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&TransportConfig::default())
    }

    /// Create a transport with custom timeouts and user agent
    pub fn with_config(config: &TransportConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::InvalidInput(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("{status} for {url}")));
        }
        Ok(response)
    }
}

impl Transport for HttpTransport {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        debug!("GET {url}");
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    async fn fetch_to_file(&self, url: &Url, dest: &Path) -> Result<u64> {
        debug!("GET {url} -> {}", dest.display());
        let response = self.get(url).await?;
        let expected = response.content_length();

        let file = tokio::fs::File::create(dest).await?;
        let mut writer = BufWriter::new(file);
        let mut received = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    // A body cut off before Content-Length surfaces as a stream error
                    return Err(match expected {
                        Some(expected) if received < expected => {
                            debug!("Body stream for {url} failed after {received} bytes: {e}");
                            Error::ContentTooShort { expected, received }
                        }
                        _ => e.into(),
                    });
                }
            };
            writer.write_all(&chunk).await?;
            received += chunk.len() as u64;
        }

        writer.flush().await?;

        if let Some(expected) = expected {
            if received < expected {
                return Err(Error::ContentTooShort { expected, received });
            }
        }

        Ok(received)
    }
}
