//! # Index-crawler
//!
//! Mirrors a remote file tree published through an HTTP server's
//! auto-generated directory listings ("Index of /...") onto local storage.
//!
//! A URL is classified as a file, a directory listing, or unreachable. Files
//! are downloaded, directories are recreated locally and every linked entry is
//! visited depth-first. Unreachable entries are skipped; any other failure
//! aborts the crawl.
//!
//! ```no_run
//! # async fn example() -> index_crawler::Result<()> {
//! index_crawler::download("http://mirror.example.org/pub/", "pub").await?;
//! # Ok(())
//! # }
//! ```

pub mod core;

use std::path::Path;

pub use crate::core::classify::classify;
pub use crate::core::crawler::{ensure_directory, CrawlEvent, CrawlOptions, Crawler, EventCallback};
pub use crate::core::error::{Error, Result, TransferReason};
pub use crate::core::listing::{list_directory, DirectoryListing, ListingPage};
pub use crate::core::target::{default_destination, CrawlTarget, UrlKind};
pub use crate::core::transport::{HttpTransport, Transport, TransportConfig};

/// Mirror `url` to `path` with the default HTTP transport and options
pub async fn download(url: &str, path: impl AsRef<Path>) -> Result<()> {
    download_with_options(url, path, &TransportConfig::default(), CrawlOptions::default()).await
}

/// Mirror `url` to `path` with a custom transport configuration and options
pub async fn download_with_options(
    url: &str,
    path: impl AsRef<Path>,
    config: &TransportConfig,
    options: CrawlOptions,
) -> Result<()> {
    let transport = HttpTransport::with_config(config)?;
    Crawler::with_options(transport, options).download(url, path).await
}
