//! In-memory `Transport` for unit tests

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use url::Url;

use crate::core::error::{Error, Result};
use crate::core::transport::Transport;

enum Resource {
    Page(String),
    File(Vec<u8>),
    ShortFile { data: Vec<u8>, announced: u64 },
    Failing(String),
}

/// Serves registered URLs from memory and counts calls. Unregistered URLs
/// fail like a 404.
#[derive(Default)]
pub struct FakeTransport {
    resources: HashMap<String, Resource>,
    page_fetches: AtomicUsize,
    file_fetches: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.resources.insert(url.to_string(), Resource::Page(html.to_string()));
        self
    }

    pub fn file(mut self, url: &str, data: &[u8]) -> Self {
        self.resources.insert(url.to_string(), Resource::File(data.to_vec()));
        self
    }

    /// A file whose body ends before the announced length
    pub fn short_file(mut self, url: &str, data: &[u8], announced: u64) -> Self {
        self.resources.insert(
            url.to_string(),
            Resource::ShortFile {
                data: data.to_vec(),
                announced,
            },
        );
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.resources.insert(url.to_string(), Resource::Failing(message.to_string()));
        self
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    pub fn file_fetches(&self) -> usize {
        self.file_fetches.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &Url) -> Result<&Resource> {
        match self.resources.get(url.as_str()) {
            Some(Resource::Failing(message)) => Err(Error::NetworkError(message.clone())),
            Some(resource) => Ok(resource),
            None => Err(Error::HttpError(format!("404 Not Found for {url}"))),
        }
    }
}

impl Transport for FakeTransport {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        match self.lookup(url)? {
            Resource::Page(html) => Ok(html.clone()),
            Resource::File(data) | Resource::ShortFile { data, .. } => {
                Ok(String::from_utf8_lossy(data).into_owned())
            }
            Resource::Failing(_) => unreachable!("failing resources are handled by lookup"),
        }
    }

    async fn fetch_to_file(&self, url: &Url, dest: &Path) -> Result<u64> {
        self.file_fetches.fetch_add(1, Ordering::SeqCst);
        let (data, announced) = match self.lookup(url)? {
            Resource::Page(html) => (html.as_bytes(), None),
            Resource::File(data) => (data.as_slice(), None),
            Resource::ShortFile { data, announced } => (data.as_slice(), Some(*announced)),
            Resource::Failing(_) => unreachable!("failing resources are handled by lookup"),
        };

        tokio::fs::write(dest, data).await?;

        match announced {
            Some(expected) if (data.len() as u64) < expected => Err(Error::ContentTooShort {
                expected,
                received: data.len() as u64,
            }),
            _ => Ok(data.len() as u64),
        }
    }
}
