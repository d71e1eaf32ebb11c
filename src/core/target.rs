//! Units of crawl work
//!
//! A crawl is a tree of `CrawlTarget`s: the root one built from the caller's
//! URL and destination, the rest produced by directory listings.

use std::path::{Path, PathBuf};

use url::Url;

use crate::core::error::Result;

/// What a URL turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Download it directly
    File,
    /// A listing page to descend into
    Directory,
    /// Could not be fetched; the branch is skipped
    Unreachable,
}

/// A remote resource and the local path it should land at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub path: PathBuf,
}

impl CrawlTarget {
    pub fn new(url: Url, path: impl Into<PathBuf>) -> Self {
        Self {
            url,
            path: path.into(),
        }
    }

    /// Builds the root target from caller input, rejecting relative or malformed URLs.
    pub fn root(url: &str, path: impl AsRef<Path>) -> Result<Self> {
        let url = Url::parse(url.trim())?;
        Ok(Self::new(url, path.as_ref()))
    }
}

/// Derives a default destination name from a URL: the last non-empty path
/// segment (percent-decoded), falling back to the host name.
pub fn default_destination(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| String::from_utf8_lossy(&urlencoding::decode_binary(s.as_bytes())).into_owned())
        .filter(|s| s != "." && s != ".." && !s.contains('/'));

    match segment {
        Some(name) => name,
        None => url.host_str().unwrap_or("index").to_string(),
    }
}
